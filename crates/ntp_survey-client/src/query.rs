// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! One-shot host query: resolve, exchange once, decode, normalize.

use log::debug;
use std::time::Duration;

use crate::error::QueryError;
use crate::protocol;
use crate::record::{ClockAttributes, HostRecord};
use crate::transport::{Transport, UdpTransport};

/// Per-query settings.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryConfig {
    /// Service port to resolve and query.
    pub port: u16,
    /// Upper bound for the single exchange (send + receive).
    pub timeout: Duration,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            port: protocol::PORT,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Queries hosts one at a time over a [`Transport`].
///
/// # Examples
///
/// ```no_run
/// # async fn example() {
/// use ntp_survey_client::QueryClient;
///
/// match QueryClient::new().query("time.google.com").await {
///     Ok(record) => println!("{record}"),
///     Err(e) => eprintln!("{e}"),
/// }
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct QueryClient<T = UdpTransport> {
    transport: T,
    config: QueryConfig,
}

impl QueryClient<UdpTransport> {
    /// A client over UDP with default settings.
    pub fn new() -> Self {
        QueryClient::with_transport(UdpTransport)
    }
}

impl Default for QueryClient<UdpTransport> {
    fn default() -> Self {
        QueryClient::new()
    }
}

impl<T: Transport> QueryClient<T> {
    /// A client over the given transport with default settings.
    pub fn with_transport(transport: T) -> Self {
        QueryClient {
            transport,
            config: QueryConfig::default(),
        }
    }

    /// Replace the query settings.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// The active settings.
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Query `host` once.
    ///
    /// The returned record has no country; callers attach it with
    /// [`HostRecord::with_country`].
    ///
    /// # Errors
    ///
    /// - [`QueryError::Resolution`] if the name does not resolve or resolves to
    ///   nothing; no packet is sent in that case.
    /// - [`QueryError::Exchange`] if the exchange times out, the socket fails,
    ///   or the reply is invalid. There is no retry.
    /// - [`QueryError::Decode`] if the reference identifier cannot be rendered.
    pub async fn query(&self, host: &str) -> Result<HostRecord, QueryError> {
        let addrs = match self.transport.resolve(host, self.config.port).await {
            Ok(addrs) if !addrs.is_empty() => addrs,
            Ok(_) => {
                return Err(QueryError::Resolution {
                    host: host.to_owned(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "address resolved to no socket addresses",
                    ),
                });
            }
            Err(source) => {
                return Err(QueryError::Resolution {
                    host: host.to_owned(),
                    source,
                });
            }
        };

        let result = self
            .transport
            .exchange(&addrs, self.config.timeout)
            .await
            .map_err(|source| QueryError::Exchange {
                host: host.to_owned(),
                source,
            })?;
        debug!(
            "{host}: stratum={} offset={:.6} delay={:.6}",
            result.stratum.0, result.offset_seconds, result.delay_seconds
        );

        let attributes = ClockAttributes::from_result(&result).map_err(|source| {
            QueryError::Decode {
                host: host.to_owned(),
                source,
            }
        })?;

        Ok(HostRecord {
            host: host.to_owned(),
            country: None,
            attributes,
        })
    }
}
