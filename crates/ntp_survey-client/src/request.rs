//! Packet construction and reply validation for a single NTP exchange.
//!
//! These helpers are pure computation over buffers and timestamps; the socket
//! work lives in [`crate::transport`]. They are public so that alternative
//! [`Transport`](crate::Transport) implementations can reuse them.

use std::io;
use std::net::SocketAddr;
use std::ops::Deref;

use crate::error::ProtocolError;
use crate::protocol::{self, ConstPackedSizeBytes};
use crate::unix_time;

/// Select the unspecified bind address matching the target's address family.
pub(crate) fn bind_addr_for(target: &SocketAddr) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], 0)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], 0)),
    }
}

/// The outcome of one exchange: the server's header plus computed timing.
///
/// Implements `Deref<Target = protocol::Packet>`, so header fields can be read
/// directly (e.g. `result.stratum`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NtpResult {
    /// The parsed NTP response header.
    pub packet: protocol::Packet,
    /// Local time (T4) when the response was received.
    pub destination_timestamp: protocol::TimestampFormat,
    /// Clock offset `((T2 - T1) + (T3 - T4)) / 2` per RFC 5905 Section 8.
    ///
    /// A positive value means the local clock is behind the server.
    pub offset_seconds: f64,
    /// Round-trip delay `(T4 - T1) - (T3 - T2)` per RFC 5905 Section 8.
    pub delay_seconds: f64,
}

impl Deref for NtpResult {
    type Target = protocol::Packet;
    fn deref(&self) -> &Self::Target {
        &self.packet
    }
}

/// Compute clock offset and round-trip delay from the four timestamps.
pub fn compute_offset_delay(
    t1: &unix_time::Instant,
    t2: &unix_time::Instant,
    t3: &unix_time::Instant,
    t4: &unix_time::Instant,
) -> (f64, f64) {
    let t1 = t1.as_secs_f64();
    let t2 = t2.as_secs_f64();
    let t3 = t3.as_secs_f64();
    let t4 = t4.as_secs_f64();
    let offset = ((t2 - t1) + (t3 - t4)) / 2.0;
    let delay = (t4 - t1) - (t3 - t2);
    (offset, delay)
}

/// Build and serialize an NTPv4 client request stamped with the current time.
///
/// Returns the datagram and the origin timestamp (T1) the reply must echo.
pub fn build_request() -> io::Result<(
    [u8; protocol::Packet::PACKED_SIZE_BYTES],
    protocol::TimestampFormat,
)> {
    let packet = protocol::Packet {
        transmit_timestamp: unix_time::Instant::now().into(),
        ..protocol::Packet::default()
    };
    Ok((packet.to_wire()?, packet.transmit_timestamp))
}

/// Validate a reply datagram and compute offset and delay.
///
/// Checks, in order: the source IP is one we resolved, the datagram holds a
/// full header, the mode is Server, the transmit timestamp is set, and the
/// origin timestamp echoes `t1`. Kiss-o'-Death and unsynchronized replies are
/// accepted; their stratum, leap indicator and kiss code end up in the record.
pub fn validate_response(
    recv_buf: &[u8],
    src_addr: SocketAddr,
    resolved_addrs: &[SocketAddr],
    t1: &protocol::TimestampFormat,
) -> io::Result<NtpResult> {
    // Record T4 before any parsing work.
    let t4_instant = unix_time::Instant::now();
    validate_response_at(recv_buf, src_addr, resolved_addrs, t1, t4_instant)
}

pub(crate) fn validate_response_at(
    recv_buf: &[u8],
    src_addr: SocketAddr,
    resolved_addrs: &[SocketAddr],
    t1: &protocol::TimestampFormat,
    t4_instant: unix_time::Instant,
) -> io::Result<NtpResult> {
    // IP only; the reply port may differ.
    if !resolved_addrs.iter().any(|a| a.ip() == src_addr.ip()) {
        return Err(ProtocolError::UnexpectedSource.into());
    }

    let response = protocol::Packet::from_wire(recv_buf)?;

    if response.mode != protocol::Mode::Server {
        return Err(ProtocolError::UnexpectedMode {
            mode: response.mode as u8,
        }
        .into());
    }
    if response.transmit_timestamp.is_zero() {
        return Err(ProtocolError::ZeroTransmitTimestamp.into());
    }
    if response.origin_timestamp != *t1 {
        return Err(ProtocolError::OriginTimestampMismatch.into());
    }

    let t4: protocol::TimestampFormat = t4_instant.into();
    let t1_instant = unix_time::timestamp_to_instant(*t1, &t4_instant);
    let t2_instant = unix_time::timestamp_to_instant(response.receive_timestamp, &t4_instant);
    let t3_instant = unix_time::timestamp_to_instant(response.transmit_timestamp, &t4_instant);
    let (offset_seconds, delay_seconds) =
        compute_offset_delay(&t1_instant, &t2_instant, &t3_instant, &t4_instant);

    Ok(NtpResult {
        packet: response,
        destination_timestamp: t4,
        offset_seconds,
        delay_seconds,
    })
}
