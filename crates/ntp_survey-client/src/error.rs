// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the query client.
//!
//! The transport layer speaks `io::Result`; reply validation failures are
//! built as [`ProtocolError`] and carried inside the `io::Error`, so callers
//! can downcast:
//!
//! ```no_run
//! # async fn example() {
//! use ntp_survey_client::QueryClient;
//! use ntp_survey_client::error::{ProtocolError, QueryError};
//!
//! match QueryClient::new().query("time.nist.gov").await {
//!     Ok(record) => println!("{record}"),
//!     Err(QueryError::Exchange { source, .. }) => {
//!         if let Some(p) = source.get_ref().and_then(|e| e.downcast_ref::<ProtocolError>()) {
//!             eprintln!("bad reply: {p}");
//!         }
//!     }
//!     Err(other) => eprintln!("{other}"),
//! }
//! # }
//! ```

// Re-export proto error types for convenience.
pub use ntp_survey_proto::error::ParseError;
pub use ntp_survey_proto::refid::RefIdError;

use std::fmt;
use std::io;

/// Why a single host query produced no record.
///
/// Each variant carries the host as queried.
#[derive(Debug)]
pub enum QueryError {
    /// The host name did not resolve to any socket address.
    Resolution {
        /// The host as queried.
        host: String,
        /// Resolver failure.
        source: io::Error,
    },
    /// The single request/response exchange failed (timeout, socket error,
    /// or an invalid reply).
    Exchange {
        /// The host as queried.
        host: String,
        /// Transport or validation failure.
        source: io::Error,
    },
    /// The reply arrived but its reference identifier could not be rendered.
    Decode {
        /// The host as queried.
        host: String,
        /// Decoding failure.
        source: RefIdError,
    },
}

/// Reply validation failures.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProtocolError {
    /// Reply came from an address we did not send to.
    UnexpectedSource,
    /// Reply mode is not Server.
    UnexpectedMode {
        /// The raw mode value received.
        mode: u8,
    },
    /// Origin timestamp does not echo our transmit timestamp.
    OriginTimestampMismatch,
    /// Server transmit timestamp is zero (unsent).
    ZeroTransmitTimestamp,
}

impl QueryError {
    /// The host this failure refers to.
    pub fn host(&self) -> &str {
        match self {
            QueryError::Resolution { host, .. }
            | QueryError::Exchange { host, .. }
            | QueryError::Decode { host, .. } => host,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::Resolution { host, source } => {
                write!(f, "cannot resolve host '{host}': {source}")
            }
            QueryError::Exchange { host, source } => {
                write!(f, "NTP exchange with '{host}' failed: {source}")
            }
            QueryError::Decode { host, source } => {
                write!(f, "cannot convert reference from '{host}': {source}")
            }
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnexpectedSource => write!(f, "response from unexpected source address"),
            ProtocolError::UnexpectedMode { mode } => {
                write!(f, "unexpected response mode {mode} (expected Server)")
            }
            ProtocolError::OriginTimestampMismatch => {
                write!(
                    f,
                    "origin timestamp mismatch: response does not match our request"
                )
            }
            ProtocolError::ZeroTransmitTimestamp => {
                write!(f, "server transmit timestamp is zero")
            }
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Resolution { source, .. } | QueryError::Exchange { source, .. } => {
                Some(source)
            }
            QueryError::Decode { source, .. } => Some(source),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<ProtocolError> for io::Error {
    fn from(err: ProtocolError) -> io::Error {
        io::Error::new(io::ErrorKind::InvalidData, err)
    }
}
