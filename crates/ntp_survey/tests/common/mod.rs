// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! In-memory directory, transport and control interface for pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ntp_survey::error::{FetchError, MetricsError};
use ntp_survey::fetch::PageFetcher;
use ntp_survey::metrics::ControlQuery;
use ntp_survey_client::protocol::{Mode, Packet, ReferenceId, Stratum, Version};
use ntp_survey_client::{NtpResult, Transport};
use reqwest::Url;

pub const BASE: &str = "http://directory.test";

/// A listing row in the layout the row matcher expects.
pub fn listing_row(code: &str, detail_path: &str) -> String {
    format!(r#"| {code} | City | <a href="{detail_path}">{detail_path}</a> open |"#)
}

/// A detail page advertising `host`.
pub fn detail_page(host: &str) -> String {
    format!("<table>\n<tr><th>Hostname</th>\n{host}\n</tr>\n</table>\n")
}

/// Serves pages from a map; unknown URLs answer 404.
#[derive(Clone, Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubFetcher {
    pub fn with_page(mut self, path: &str, body: impl Into<String>) -> Self {
        self.pages.insert(format!("{BASE}{path}"), body.into());
        self
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Resolves known hosts to distinct documentation addresses and answers
/// exchanges with a canned stratum-1 reply.
#[derive(Clone, Default)]
pub struct StubTransport {
    hosts: Vec<String>,
    pub resolved: Arc<Mutex<Vec<String>>>,
    pub exchanged: Arc<Mutex<Vec<SocketAddr>>>,
}

impl StubTransport {
    pub fn with_host(mut self, host: &str) -> Self {
        self.hosts.push(host.to_owned());
        self
    }

    fn addr_of(index: usize, port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 0, 2, index as u8 + 1)), port)
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn resolve(&self, host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
        self.resolved.lock().unwrap().push(host.to_owned());
        match self.hosts.iter().position(|h| h == host) {
            Some(i) => Ok(vec![Self::addr_of(i, port)]),
            None => Err(io::Error::new(io::ErrorKind::NotFound, "unknown host")),
        }
    }

    async fn exchange(&self, addrs: &[SocketAddr], _timeout: Duration) -> io::Result<NtpResult> {
        self.exchanged.lock().unwrap().push(addrs[0]);
        let packet = Packet {
            version: Version::V4,
            mode: Mode::Server,
            stratum: Stratum::PRIMARY,
            reference_id: ReferenceId::from_label("GPS"),
            ..Packet::default()
        };
        Ok(NtpResult {
            packet,
            destination_timestamp: Default::default(),
            offset_seconds: 0.000123,
            delay_seconds: 0.004,
        })
    }
}

/// Returns fixed control output.
pub struct StubControl {
    pub output: Result<String, io::ErrorKind>,
    pub requested: Arc<Mutex<Vec<String>>>,
}

impl StubControl {
    pub fn answering(output: &str) -> Self {
        StubControl {
            output: Ok(output.to_owned()),
            requested: Arc::default(),
        }
    }

    pub fn failing(kind: io::ErrorKind) -> Self {
        StubControl {
            output: Err(kind),
            requested: Arc::default(),
        }
    }
}

#[async_trait]
impl ControlQuery for StubControl {
    async fn read_variables(&self, names: &[String]) -> Result<String, MetricsError> {
        self.requested.lock().unwrap().extend(names.iter().cloned());
        self.output.clone().map_err(|kind| MetricsError::Command {
            program: "ntpq".into(),
            source: io::Error::new(kind, "stub failure"),
        })
    }
}
