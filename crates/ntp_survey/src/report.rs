// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Survey driver and report rendering.

use log::{info, warn};
use ntp_survey_client::{HostRecord, QueryClient, Transport, UdpTransport};
use reqwest::Url;
use serde::Serialize;
use std::io::{self, Write};

use crate::config::SurveyConfig;
use crate::country::CountryCode;
use crate::error::SurveyError;
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::harvest::{Harvest, Harvester, Tier};

/// Results for one configured country.
#[derive(Clone, Debug, Serialize)]
pub struct CountryReport {
    /// Normalized country code.
    pub code: CountryCode,
    /// Registry name, if the code is registered.
    pub name: Option<&'static str>,
    /// One entry per discovered server, in discovery order.
    pub entries: Vec<Option<HostRecord>>,
}

/// Outcome of one survey run.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    /// Tier that was harvested.
    pub tier: u8,
    /// Per-country results in code order.
    pub countries: Vec<CountryReport>,
    /// Well-known hosts and their results, in configured order.
    pub well_known: Vec<(String, Option<HostRecord>)>,
    /// Set when the tier listing could not be fetched; every country is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_error: Option<String>,
}

impl Report {
    /// All records that were obtained, country records first.
    pub fn records(&self) -> impl Iterator<Item = &HostRecord> {
        self.countries
            .iter()
            .flat_map(|c| c.entries.iter().flatten())
            .chain(self.well_known.iter().filter_map(|(_, r)| r.as_ref()))
    }

    /// Write the report as indented text, one line per host.
    pub fn render<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for country in &self.countries {
            writeln!(
                out,
                "Country: {} ({})",
                country.name.unwrap_or("unknown"),
                country.code
            )?;
            for entry in &country.entries {
                render_entry(out, entry.as_ref())?;
            }
            writeln!(out)?;
        }
        if !self.well_known.is_empty() {
            writeln!(out, "Well-known sources:")?;
            for (host, entry) in &self.well_known {
                match entry {
                    Some(record) => writeln!(out, "  {record}")?,
                    None => writeln!(out, "  {host} (no record)")?,
                }
            }
        }
        Ok(())
    }
}

fn render_entry<W: Write>(out: &mut W, entry: Option<&HostRecord>) -> io::Result<()> {
    match entry {
        Some(record) => writeln!(out, "  {record}"),
        None => writeln!(out, "  (no record)"),
    }
}

/// Drives a harvest and the well-known host queries.
///
/// # Examples
///
/// ```no_run
/// use ntp_survey::config::SurveyConfig;
/// use ntp_survey::harvest::Tier;
/// use ntp_survey::report::Aggregator;
///
/// # async fn example() -> Result<(), ntp_survey::error::SurveyError> {
/// let aggregator = Aggregator::new(SurveyConfig::default())?;
/// let report = aggregator.run(Tier::One, true).await?;
/// report.render(&mut std::io::stdout()).ok();
/// # Ok(())
/// # }
/// ```
pub struct Aggregator<F = HttpFetcher, T = UdpTransport> {
    config: SurveyConfig,
    base: Url,
    fetcher: F,
    client: QueryClient<T>,
}

impl Aggregator<HttpFetcher, UdpTransport> {
    /// An aggregator over HTTP and UDP.
    pub fn new(config: SurveyConfig) -> Result<Self, SurveyError> {
        let fetcher = HttpFetcher::new(config.http_timeout)?;
        let client = QueryClient::new();
        Aggregator::with_parts(config, fetcher, client)
    }
}

impl<F: PageFetcher, T: Transport> Aggregator<F, T> {
    /// An aggregator over the given fetcher and query client.
    ///
    /// The client's settings are replaced by `config.query`.
    pub fn with_parts(
        config: SurveyConfig,
        fetcher: F,
        client: QueryClient<T>,
    ) -> Result<Self, SurveyError> {
        let base = config.validate()?;
        let client = client.with_config(config.query.clone());
        Ok(Aggregator {
            config,
            base,
            fetcher,
            client,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// Harvest `tier`, then query the well-known hosts if `extra_sources`.
    ///
    /// A listing that cannot be fetched is logged and recorded in
    /// [`Report::listing_error`]; the countries come back empty and the
    /// well-known hosts are still queried.
    pub async fn run(&self, tier: Tier, extra_sources: bool) -> Result<Report, SurveyError> {
        let harvester = Harvester::new(&self.base, &self.config.countries, &self.fetcher, &self.client);
        let (harvest, listing_error) = match harvester.harvest(tier).await {
            Ok(harvest) => (harvest, None),
            Err(e) => {
                warn!("tier {tier} listing unavailable: {e}");
                let empty: Harvest = self
                    .config
                    .countries
                    .iter()
                    .map(|code| (code.clone(), Vec::new()))
                    .collect();
                (empty, Some(e.to_string()))
            }
        };

        let countries = harvest
            .into_iter()
            .map(|(code, entries)| CountryReport {
                name: code.name(),
                code,
                entries,
            })
            .collect();

        let mut well_known = Vec::new();
        if extra_sources {
            info!("querying {} well-known sources", self.config.well_known_hosts.len());
            for host in &self.config.well_known_hosts {
                let record = match self.client.query(host).await {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("{e}");
                        None
                    }
                };
                well_known.push((host.clone(), record));
            }
        }

        Ok(Report {
            tier: tier.number(),
            countries,
            well_known,
            listing_error,
        })
    }
}
