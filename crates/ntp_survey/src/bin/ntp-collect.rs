// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Read clock-quality variables from the local NTP daemon and print them as JSON.
//!
//! Run with: `ntp-collect --ntpq /usr/sbin/ntpq`

use clap::Parser;
use std::path::PathBuf;

use ntp_survey::config::DEFAULT_NTPQ_PATH;
use ntp_survey::{MetricsCollector, MetricsConfig};

#[derive(Debug, Parser)]
#[command(name = "ntp-collect", version, about = "Collect local NTP daemon metrics")]
struct Args {
    /// Path to the ntpq control program
    #[arg(long, default_value = DEFAULT_NTPQ_PATH)]
    ntpq: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = MetricsConfig::default().with_ntpq_path(args.ntpq);
    let sample = MetricsCollector::new(&config).collect().await?;
    println!("{}", serde_json::to_string_pretty(&sample)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ntpq_path_defaults_and_overrides() {
        let args = Args::try_parse_from(["ntp-collect"]).unwrap();
        assert_eq!(args.ntpq, PathBuf::from(DEFAULT_NTPQ_PATH));
        let args = Args::try_parse_from(["ntp-collect", "--ntpq", "/opt/ntp/bin/ntpq"]).unwrap();
        assert_eq!(args.ntpq, PathBuf::from("/opt/ntp/bin/ntpq"));
    }
}
