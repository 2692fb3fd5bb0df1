// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTP header types and the small amount of protocol logic the survey needs.
//!
//! This crate provides the 48-byte NTPv4 header (RFC 5905), its network-endian
//! codec, NTP/Unix time conversion, and stratum-dependent decoding of the
//! reference identifier field.

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Error types for header parsing.
pub mod error;

/// NTP protocol types and constants (RFC 5905).
pub mod protocol;

/// Stratum-dependent rendering of the reference identifier.
pub mod refid;

/// Unix time conversion utilities for NTP timestamps.
///
/// Provides the `Instant` type for converting between NTP timestamps
/// (seconds since 1900-01-01) and Unix timestamps (seconds since 1970-01-01).
pub mod unix_time;
