// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Harvest a tier of the public NTP directory and query every listed server.
//!
//! Run with: `ntp-survey 1 --extra-sources`
//! Enable diagnostics with: `RUST_LOG=info ntp-survey 2`

use clap::Parser;
use std::io::{self, Write};
use std::time::Duration;

use ntp_survey::config::DEFAULT_BASE_URL;
use ntp_survey::{Aggregator, QueryConfig, SurveyConfig, Tier};

#[derive(Debug, Parser)]
#[command(name = "ntp-survey", version, about = "Survey public NTP servers by country")]
struct Args {
    /// Directory tier to harvest (1 or 2)
    tier: Tier,

    /// Also query the well-known public sources
    #[arg(long)]
    extra_sources: bool,

    /// Root of the server directory
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Per-request timeout in seconds, for NTP exchanges and page fetches
    #[arg(long, default_value_t = 5)]
    timeout: u64,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let timeout = Duration::from_secs(args.timeout);
    let config = SurveyConfig::default()
        .with_base_url(args.base_url)
        .with_http_timeout(timeout)
        .with_query(QueryConfig {
            timeout,
            ..QueryConfig::default()
        });

    let report = Aggregator::new(config)?.run(args.tier, args.extra_sources).await?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        report.render(&mut out)?;
    }
    Ok(())
}
