// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Rendering of the reference identifier field (RFC 5905 Section 7.3).
//!
//! - Stratum 0 carries a four-character kiss code (`RATE`, `DENY`, ...).
//! - Stratum 1 carries a left-justified, zero-padded ASCII label for the
//!   reference clock (`GPS`, `PPS`, `GOOG`, ...).
//! - Stratum 2 and above carry the IPv4 address of the upstream server (or the
//!   first four octets of the MD5 hash of an IPv6 address, which renders as an
//!   arbitrary dotted quad).

use std::fmt;
use std::net::Ipv4Addr;

use crate::protocol::{ReferenceId, Stratum};

/// Reasons a reference identifier cannot be rendered.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RefIdError {
    /// Stratum 255 has no defined reference identifier encoding.
    InvalidStratum(u8),
    /// A stratum 0/1 label holds bytes that are not printable ASCII.
    NonPrintable {
        /// The raw identifier octets.
        octets: [u8; 4],
    },
}

impl fmt::Display for RefIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefIdError::InvalidStratum(stratum) => {
                write!(f, "invalid stratum {stratum} for reference identifier")
            }
            RefIdError::NonPrintable { octets } => {
                write!(
                    f,
                    "reference identifier is not a printable label: {:02X}{:02X}{:02X}{:02X}",
                    octets[0], octets[1], octets[2], octets[3]
                )
            }
        }
    }
}

impl std::error::Error for RefIdError {}

/// Render `id` according to the `stratum` of the packet that carried it.
///
/// # Examples
///
/// ```
/// use ntp_survey_proto::protocol::{ReferenceId, Stratum};
/// use ntp_survey_proto::refid;
///
/// assert_eq!(refid::decode(ReferenceId(*b"GPS\0"), Stratum(1)).unwrap(), "GPS");
/// assert_eq!(refid::decode(ReferenceId([192, 0, 2, 7]), Stratum(3)).unwrap(), "192.0.2.7");
/// ```
pub fn decode(id: ReferenceId, stratum: Stratum) -> Result<String, RefIdError> {
    match stratum.0 {
        0 | 1 => decode_label(id.0),
        2..=254 => Ok(Ipv4Addr::from(id.0).to_string()),
        other => Err(RefIdError::InvalidStratum(other)),
    }
}

fn decode_label(octets: [u8; 4]) -> Result<String, RefIdError> {
    let len = octets.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    let label = &octets[..len];
    if !label.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return Err(RefIdError::NonPrintable { octets });
    }
    // All bytes are ASCII at this point.
    Ok(label.iter().map(|&b| b as char).collect())
}
