// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The time-protocol primitive consumed by [`QueryClient`](crate::QueryClient).
//!
//! A [`Transport`] knows how to resolve a name and how to run exactly one
//! request/response exchange. [`UdpTransport`] is the real implementation over
//! tokio sockets; tests substitute their own.

use async_trait::async_trait;
use log::debug;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

use crate::NtpResult;
use crate::request::{bind_addr_for, build_request, validate_response};

/// Resolution and single-exchange capability.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Resolve `host` for the NTP service on `port`.
    ///
    /// An empty list is treated by the caller as a resolution failure.
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>>;

    /// Run one request/response exchange against the first reachable address.
    ///
    /// Implementations must give up after `timeout` and must not retry.
    async fn exchange(&self, addrs: &[SocketAddr], timeout: Duration) -> io::Result<NtpResult>;
}

/// NTPv4 over UDP using the tokio runtime.
///
/// Must be used from within a tokio runtime context.
#[derive(Clone, Copy, Debug, Default)]
pub struct UdpTransport;

#[async_trait]
impl Transport for UdpTransport {
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        let addrs: Vec<SocketAddr> = tokio::net::lookup_host((host, port)).await?.collect();
        debug!("{host} resolved to {addrs:?}");
        Ok(addrs)
    }

    async fn exchange(&self, addrs: &[SocketAddr], timeout: Duration) -> io::Result<NtpResult> {
        tokio::time::timeout(timeout, exchange_inner(addrs))
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "NTP request timed out"))?
    }
}

async fn exchange_inner(addrs: &[SocketAddr]) -> io::Result<NtpResult> {
    let target_addr = *addrs.first().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "address resolved to no socket addresses",
        )
    })?;

    let (send_buf, t1) = build_request()?;

    let sock = UdpSocket::bind(bind_addr_for(&target_addr)).await?;
    let sz = sock.send_to(&send_buf, target_addr).await?;
    debug!("{:?}", sock.local_addr());
    debug!("sent: {} bytes to {}", sz, target_addr);

    // Larger than a bare header so extension fields do not truncate the read.
    let mut recv_buf = [0u8; 1024];
    let (recv_len, src_addr) = sock.recv_from(&mut recv_buf[..]).await?;
    debug!("recv: {} bytes from {:?}", recv_len, src_addr);

    validate_response(&recv_buf[..recv_len], src_addr, addrs, &t1)
}
