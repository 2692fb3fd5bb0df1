// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Normalized per-host output of a successful query.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::NtpResult;
use crate::refid::{self, RefIdError};

/// Clock-quality attributes captured from one exchange.
///
/// Always complete: a record exists only when every field could be filled.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClockAttributes {
    /// Estimated clock difference in seconds (positive: local clock behind).
    pub offset: f64,
    /// Round-trip delay in seconds.
    pub delay: f64,
    /// Server's total round-trip delay to its reference clock, in seconds.
    pub root_delay: f64,
    /// Leap indicator (0-3; 3 means unsynchronized).
    pub leap: u8,
    /// Protocol version of the reply.
    pub version: u8,
    /// Stratum of the server; 0 marks unspecified or a kiss-o'-death reply.
    pub stratum: u8,
    /// Association mode of the reply.
    pub mode: u8,
    /// Reference identifier rendered according to `stratum`.
    pub ref_id: String,
}

impl ClockAttributes {
    /// Extract the attribute set from an exchange result.
    ///
    /// Fails only when the reference identifier cannot be rendered.
    pub fn from_result(result: &NtpResult) -> Result<Self, RefIdError> {
        let ref_id = refid::decode(result.reference_id, result.stratum)?;
        Ok(ClockAttributes {
            offset: result.offset_seconds,
            delay: result.delay_seconds,
            root_delay: result.root_delay.as_seconds(),
            leap: result.leap_indicator as u8,
            version: result.version.value(),
            stratum: result.stratum.0,
            mode: result.mode as u8,
            ref_id,
        })
    }
}

/// One queried host and its attributes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostRecord {
    /// The host name as queried.
    pub host: String,
    /// Human-readable country name, when the caller has country context.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub country: Option<String>,
    /// Attributes of the reply.
    #[serde(flatten)]
    pub attributes: ClockAttributes,
}

impl HostRecord {
    /// Attach (or clear) the country label.
    pub fn with_country(mut self, country: Option<&str>) -> Self {
        self.country = country.map(str::to_owned);
        self
    }
}

impl fmt::Display for HostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.attributes;
        write!(
            f,
            "{} offset={:+.6} delay={:.6} root_delay={:.6} leap={} version={} stratum={} mode={} ref_id={}",
            self.host, a.offset, a.delay, a.root_delay, a.leap, a.version, a.stratum, a.mode, a.ref_id
        )?;
        if let Some(country) = &self.country {
            write!(f, " country={country}")?;
        }
        Ok(())
    }
}
