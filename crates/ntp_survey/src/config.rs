// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Survey and metrics configuration.

use ntp_survey_client::QueryConfig;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

use crate::country::CountryCode;
use crate::error::SurveyError;

/// Public directory of time servers.
pub const DEFAULT_BASE_URL: &str = "http://support.ntp.org";

/// Countries surveyed when none are configured.
pub const DEFAULT_COUNTRIES: &[&str] = &["fr", "us", "de", "ie", "nl", "uk", "gb", "ch"];

/// Widely used public sources queried with `--extra-sources`.
pub const WELL_KNOWN_HOSTS: &[&str] = &[
    "time.google.com",
    "time.facebook.com",
    "time.apple.com",
    "time.windows.com",
    "time.cloudflare.com",
    "0.amazon.pool.ntp.org",
    "0.freebsd.pool.ntp.org",
    "0.netbsd.pool.ntp.org",
    "0.openbsd.pool.ntp.org",
    "0.centos.pool.ntp.org",
    "0.gentoo.pool.ntp.org",
    "0.ubuntu.pool.ntp.org",
    "0.debian.pool.ntp.org",
    "ntp.midway.ovh",
    "ntp.laas.fr",
    "ntp.inria.fr",
    "ntp.polytechnique.fr",
];

/// Default location of the daemon control program.
pub const DEFAULT_NTPQ_PATH: &str = "/usr/bin/ntpq";

/// System variables read from the local daemon.
pub const DEFAULT_METRICS: &[&str] = &[
    "stratum",
    "offset",
    "rootdelay",
    "clk_jitter",
    "sys_jitter",
    "clk_wander",
];

/// Settings for a directory survey.
///
/// # Examples
///
/// ```
/// use ntp_survey::config::SurveyConfig;
/// use std::time::Duration;
///
/// let config = SurveyConfig::default()
///     .with_countries(&["fr", "ch"])
///     .with_http_timeout(Duration::from_secs(10));
/// assert_eq!(config.countries.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct SurveyConfig {
    /// Root of the directory site; tier paths are joined onto it.
    pub base_url: String,
    /// Countries to harvest.
    pub countries: Vec<CountryCode>,
    /// Hosts queried without country association.
    pub well_known_hosts: Vec<String>,
    /// Per-host NTP query settings.
    pub query: QueryConfig,
    /// Timeout for each HTTP request.
    pub http_timeout: Duration,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        SurveyConfig {
            base_url: DEFAULT_BASE_URL.to_owned(),
            countries: DEFAULT_COUNTRIES.iter().copied().map(CountryCode::new).collect(),
            well_known_hosts: WELL_KNOWN_HOSTS.iter().map(|h| (*h).to_owned()).collect(),
            query: QueryConfig::default(),
            http_timeout: Duration::from_secs(30),
        }
    }
}

impl SurveyConfig {
    /// Replace the directory base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the surveyed countries. Codes are normalized.
    pub fn with_countries(mut self, codes: &[&str]) -> Self {
        self.countries = codes.iter().copied().map(CountryCode::new).collect();
        self
    }

    /// Replace the well-known host list.
    pub fn with_well_known_hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.well_known_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the NTP query settings.
    pub fn with_query(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    /// Replace the HTTP timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Check the settings and return the parsed base URL.
    pub fn validate(&self) -> Result<Url, SurveyError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| SurveyError::InvalidConfig(format!("base URL '{}': {e}", self.base_url)))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(SurveyError::InvalidConfig(format!(
                "base URL '{}' is not http(s)",
                self.base_url
            )));
        }
        if let Some(bad) = self.countries.iter().find(|c| !c.is_well_formed()) {
            return Err(SurveyError::InvalidConfig(format!(
                "country code '{bad}' is not two letters"
            )));
        }
        if self.query.timeout.is_zero() || self.http_timeout.is_zero() {
            return Err(SurveyError::InvalidConfig("timeouts must be non-zero".into()));
        }
        Ok(base)
    }
}

/// Settings for local daemon metric collection.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricsConfig {
    /// Control program to invoke.
    pub ntpq_path: PathBuf,
    /// Variable names to read.
    pub metrics: Vec<String>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        MetricsConfig {
            ntpq_path: PathBuf::from(DEFAULT_NTPQ_PATH),
            metrics: DEFAULT_METRICS.iter().map(|m| (*m).to_owned()).collect(),
        }
    }
}

impl MetricsConfig {
    /// Replace the control program path.
    pub fn with_ntpq_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ntpq_path = path.into();
        self
    }
}
