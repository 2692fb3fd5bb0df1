// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for query integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;

use ntp_survey_client::protocol::{LeapIndicator, Mode, Packet, ReferenceId, Stratum};
use ntp_survey_client::unix_time::Instant;
use tokio::net::UdpSocket;

/// How the loopback server fills the fields a survey cares about.
#[derive(Clone, Copy, Debug)]
pub struct Persona {
    pub stratum: u8,
    pub reference_id: ReferenceId,
    pub leap: LeapIndicator,
    /// When false the server swallows requests and never answers.
    pub answers: bool,
}

impl Persona {
    pub fn primary(label: &str) -> Self {
        Persona {
            stratum: 1,
            reference_id: ReferenceId::from_label(label),
            leap: LeapIndicator::NoWarning,
            answers: true,
        }
    }

    pub fn secondary(upstream: [u8; 4]) -> Self {
        Persona {
            stratum: 2,
            reference_id: ReferenceId(upstream),
            leap: LeapIndicator::NoWarning,
            answers: true,
        }
    }

    pub fn silent() -> Self {
        Persona {
            answers: false,
            ..Persona::primary("GPS")
        }
    }
}

/// Spawn a single-socket NTP responder on an ephemeral loopback port.
///
/// The task runs until the tokio runtime is dropped.
pub async fn spawn_responder(persona: Persona) -> SocketAddr {
    let sock = UdpSocket::bind("127.0.0.1:0")
        .await
        .expect("failed to bind responder");
    let addr = sock.local_addr().expect("failed to get local addr");
    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        loop {
            let Ok((len, peer)) = sock.recv_from(&mut buf).await else {
                return;
            };
            if !persona.answers {
                continue;
            }
            let Ok(request) = Packet::from_wire(&buf[..len]) else {
                continue;
            };
            let now = Instant::now().into();
            let reply = Packet {
                leap_indicator: persona.leap,
                version: request.version,
                mode: Mode::Server,
                stratum: Stratum(persona.stratum),
                precision: -20,
                reference_id: persona.reference_id,
                origin_timestamp: request.transmit_timestamp,
                receive_timestamp: now,
                transmit_timestamp: now,
                ..Packet::default()
            };
            let wire = reply.to_wire().expect("failed to serialize reply");
            let _ = sock.send_to(&wire, peer).await;
        }
    });
    addr
}
