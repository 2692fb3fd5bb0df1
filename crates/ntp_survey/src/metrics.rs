// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Local daemon metrics through the `ntpq` control interface.

use async_trait::async_trait;
use dns_lookup::{AddrInfoHints, getaddrinfo};
use log::debug;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use tokio::process::Command;

use crate::config::MetricsConfig;
use crate::error::MetricsError;

/// One collection: `"<hostname>.<variable>"` to raw value.
pub type MetricSample = BTreeMap<String, String>;

/// Reads system variables from the local time daemon.
#[async_trait]
pub trait ControlQuery: Send + Sync {
    /// Return the raw `key=value` text for `names`.
    async fn read_variables(&self, names: &[String]) -> Result<String, MetricsError>;
}

/// Runs `ntpq -c "rv 0 <names>"`.
#[derive(Clone, Debug)]
pub struct Ntpq {
    path: PathBuf,
}

impl Ntpq {
    /// Use the program at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Ntpq { path: path.into() }
    }
}

#[async_trait]
impl ControlQuery for Ntpq {
    async fn read_variables(&self, names: &[String]) -> Result<String, MetricsError> {
        let program = self.path.display().to_string();
        let request = format!("rv 0 {}", names.join(","));
        debug!("running {program} -c '{request}'");
        let output = Command::new(&self.path)
            .arg("-c")
            .arg(&request)
            .output()
            .await
            .map_err(|source| MetricsError::Command {
                program: program.clone(),
                source,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MetricsError::Command {
                program,
                source: io::Error::other(format!("{}: {}", output.status, stderr.trim())),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse control output into a sample namespaced by `hostname`.
///
/// Tokens are separated by commas and whitespace; each must be a single
/// `key=value` pair with a non-empty key.
///
/// ```
/// use ntp_survey::metrics::parse_variables;
///
/// let sample = parse_variables("node1", "stratum=2, offset=0.001, rootdelay=0.02").unwrap();
/// assert_eq!(sample["node1.offset"], "0.001");
/// ```
pub fn parse_variables(hostname: &str, raw: &str) -> Result<MetricSample, MetricsError> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.contains('=') => {
                Ok((format!("{hostname}.{key}"), value.to_owned()))
            }
            _ => Err(MetricsError::Malformed {
                token: token.to_owned(),
            }),
        })
        .collect()
}

/// The fully qualified local host name.
///
/// Falls back to the bare name from the operating system when the resolver
/// has no canonical name for it.
pub fn local_hostname() -> String {
    let short = gethostname::gethostname().to_string_lossy().into_owned();
    qualify(short, canonical_name)
}

fn qualify(short: String, resolve: impl FnOnce(&str) -> Option<String>) -> String {
    resolve(&short).unwrap_or(short)
}

fn canonical_name(host: &str) -> Option<String> {
    let hints = AddrInfoHints {
        flags: libc::AI_CANONNAME,
        ..AddrInfoHints::default()
    };
    let addrs = match getaddrinfo(Some(host), None, Some(hints)) {
        Ok(addrs) => addrs,
        Err(e) => {
            debug!("no canonical name for {host}: {e:?}");
            return None;
        }
    };
    addrs
        .filter_map(Result::ok)
        .find_map(|addr| addr.canonname)
        .filter(|name| !name.is_empty())
}

/// Collects one [`MetricSample`] per call.
#[derive(Clone, Debug)]
pub struct MetricsCollector<Q = Ntpq> {
    query: Q,
    hostname: String,
    metrics: Vec<String>,
}

impl MetricsCollector<Ntpq> {
    /// A collector running the configured `ntpq`, keyed by the local host name.
    pub fn new(config: &MetricsConfig) -> Self {
        MetricsCollector::with_query(
            Ntpq::new(&config.ntpq_path),
            local_hostname(),
            config.metrics.clone(),
        )
    }
}

impl<Q: ControlQuery> MetricsCollector<Q> {
    /// A collector over an arbitrary control interface.
    pub fn with_query(query: Q, hostname: impl Into<String>, metrics: Vec<String>) -> Self {
        MetricsCollector {
            query,
            hostname: hostname.into(),
            metrics,
        }
    }

    /// Host name used as the key prefix.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Read the configured variables once.
    ///
    /// # Errors
    ///
    /// [`MetricsError::Command`] if the control command fails,
    /// [`MetricsError::Malformed`] if any token of its output is not a pair.
    pub async fn collect(&self) -> Result<MetricSample, MetricsError> {
        let raw = self.query.read_variables(&self.metrics).await?;
        parse_variables(&self.hostname, &raw)
    }
}
