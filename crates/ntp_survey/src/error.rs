// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Error types for the survey pipeline and the metrics collector.
//!
//! Per-host query failures are not represented here: they are
//! [`QueryError`](ntp_survey_client::QueryError)s, logged and turned into
//! absent entries by the harvester.

use std::fmt;
use std::io;

/// Errors raised while fetching a directory page over HTTP.
#[derive(Debug)]
pub enum FetchError {
    /// The request could not be sent or the body could not be read.
    Http {
        /// Requested URL.
        url: String,
        /// Underlying HTTP client error.
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// A URL could not be built from the configured base and a path.
    InvalidUrl {
        /// The offending text.
        url: String,
        /// Parser message.
        reason: String,
    },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http { url, source } => write!(f, "GET {url} failed: {source}"),
            FetchError::Status { url, status } => write!(f, "GET {url} returned HTTP {status}"),
            FetchError::InvalidUrl { url, reason } => write!(f, "invalid URL '{url}': {reason}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Http { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Errors raised while collecting metrics from the local daemon.
#[derive(Debug)]
pub enum MetricsError {
    /// The control command could not be run or exited unsuccessfully.
    Command {
        /// Program that was invoked.
        program: String,
        /// Spawn failure, or a synthesized error describing the exit status.
        source: io::Error,
    },
    /// A token of the command output is not a single `key=value` pair.
    Malformed {
        /// The offending token.
        token: String,
    },
}

impl fmt::Display for MetricsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricsError::Command { program, source } => {
                write!(f, "control command '{program}' failed: {source}")
            }
            MetricsError::Malformed { token } => {
                write!(f, "malformed variable in control output: '{token}'")
            }
        }
    }
}

impl std::error::Error for MetricsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetricsError::Command { source, .. } => Some(source),
            MetricsError::Malformed { .. } => None,
        }
    }
}

/// Errors that prevent a survey from starting or a harvest from completing.
#[derive(Debug)]
pub enum SurveyError {
    /// The requested directory tier is not 1 or 2.
    InvalidTier(String),
    /// The tier listing could not be fetched.
    Fetch(FetchError),
    /// The configuration cannot be used.
    InvalidConfig(String),
}

impl fmt::Display for SurveyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurveyError::InvalidTier(value) => {
                write!(f, "invalid tier '{value}': expected 1 or 2")
            }
            SurveyError::Fetch(e) => write!(f, "directory listing unavailable: {e}"),
            SurveyError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for SurveyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SurveyError::Fetch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FetchError> for SurveyError {
    fn from(err: FetchError) -> Self {
        SurveyError::Fetch(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn fetch_status_display() {
        let err = FetchError::Status {
            url: "http://support.ntp.org/x".into(),
            status: 503,
        };
        assert_eq!(err.to_string(), "GET http://support.ntp.org/x returned HTTP 503");
        assert!(err.source().is_none());
    }

    #[test]
    fn survey_error_wraps_fetch() {
        let err: SurveyError = FetchError::Status {
            url: "http://a/b".into(),
            status: 404,
        }
        .into();
        assert!(matches!(err, SurveyError::Fetch(FetchError::Status { status: 404, .. })));
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("directory listing unavailable"));
    }

    #[test]
    fn metrics_command_exposes_source() {
        let err = MetricsError::Command {
            program: "/usr/bin/ntpq".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("/usr/bin/ntpq"));
        let io_err = err.source().and_then(|e| e.downcast_ref::<io::Error>()).unwrap();
        assert_eq!(io_err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn invalid_tier_display() {
        assert_eq!(
            SurveyError::InvalidTier("3".into()).to_string(),
            "invalid tier '3': expected 1 or 2"
        );
    }
}
