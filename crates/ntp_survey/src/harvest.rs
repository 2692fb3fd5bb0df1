// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Directory harvesting: listing, detail pages, per-host queries.

use log::{debug, info, warn};
use ntp_survey_client::{HostRecord, QueryClient, Transport};
use reqwest::Url;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::country::CountryCode;
use crate::directory::DirectoryPage;
use crate::error::{FetchError, SurveyError};
use crate::fetch::PageFetcher;

/// Directory tier, i.e. the advertised stratum of the listed servers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Servers attached directly to a reference clock.
    One,
    /// Servers synchronized to a tier-one server.
    Two,
}

impl Tier {
    /// Listing path on the directory site.
    pub fn path(self) -> &'static str {
        match self {
            Tier::One => "/bin/view/Servers/StratumOneTimeServers",
            Tier::Two => "/bin/view/Servers/StratumTwoTimeServers",
        }
    }

    /// The tier as a number.
    pub fn number(self) -> u8 {
        match self {
            Tier::One => 1,
            Tier::Two => 2,
        }
    }
}

impl TryFrom<u8> for Tier {
    type Error = SurveyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Tier::One),
            2 => Ok(Tier::Two),
            _ => Err(SurveyError::InvalidTier(value.to_string())),
        }
    }
}

impl FromStr for Tier {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .map_err(|_| SurveyError::InvalidTier(s.to_owned()))
            .and_then(Tier::try_from)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Per-country results in sorted code order; each list follows discovery order.
pub type Harvest = BTreeMap<CountryCode, Vec<Option<HostRecord>>>;

/// Candidate detail links discovered during one run.
///
/// Every configured code has its own list, present even when empty.
#[derive(Clone, Debug, Default)]
pub struct HarvestContext {
    candidates: BTreeMap<CountryCode, Vec<Url>>,
}

impl HarvestContext {
    /// An empty context for the given codes.
    pub fn new(codes: &[CountryCode]) -> Self {
        HarvestContext {
            candidates: codes.iter().map(|c| (c.clone(), Vec::new())).collect(),
        }
    }

    /// Record every candidate link of `listing`. Returns how many were added.
    pub fn discover(&mut self, listing: &DirectoryPage, base: &Url) -> usize {
        let mut added = 0;
        for (code, links) in self.candidates.iter_mut() {
            let before = links.len();
            links.extend(listing.candidate_links(code, base));
            added += links.len() - before;
        }
        added
    }

    /// Links discovered for `code`, in discovery order.
    pub fn candidates(&self, code: &CountryCode) -> &[Url] {
        self.candidates.get(code).map(Vec::as_slice).unwrap_or_default()
    }

    /// All codes with their links, in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&CountryCode, &[Url])> {
        self.candidates.iter().map(|(c, l)| (c, l.as_slice()))
    }
}

/// Walks a tier listing and queries every advertised host.
pub struct Harvester<'a, F, T> {
    base: &'a Url,
    countries: &'a [CountryCode],
    fetcher: &'a F,
    client: &'a QueryClient<T>,
}

impl<'a, F: PageFetcher, T: Transport> Harvester<'a, F, T> {
    /// A harvester over `base` for the given countries.
    pub fn new(
        base: &'a Url,
        countries: &'a [CountryCode],
        fetcher: &'a F,
        client: &'a QueryClient<T>,
    ) -> Self {
        Harvester {
            base,
            countries,
            fetcher,
            client,
        }
    }

    /// Fetch the tier listing and collect candidate links.
    ///
    /// # Errors
    ///
    /// Fails if the listing URL cannot be built or the listing cannot be
    /// fetched.
    pub async fn discover(&self, tier: Tier) -> Result<HarvestContext, FetchError> {
        let url = self.base.join(tier.path()).map_err(|e| FetchError::InvalidUrl {
            url: format!("{}{}", self.base, tier.path()),
            reason: e.to_string(),
        })?;
        info!("fetching tier {tier} listing from {url}");
        let listing = DirectoryPage::new(self.fetcher.fetch(&url).await?);

        let mut context = HarvestContext::new(self.countries);
        let found = context.discover(&listing, self.base);
        info!("tier {tier}: {found} candidate servers");
        Ok(context)
    }

    /// Fetch a detail page and extract its advertised host name.
    ///
    /// Fetch failures are logged and yield `None`.
    pub async fn hostname(&self, link: &Url) -> Option<String> {
        match self.fetcher.fetch(link).await {
            Ok(body) => {
                let page = DirectoryPage::new(body);
                let host = page.hostname().map(str::to_owned);
                if host.is_none() {
                    debug!("{link}: no hostname on page");
                }
                host
            }
            Err(e) => {
                warn!("{e}");
                None
            }
        }
    }

    /// Query `host` for `code`, or skip it when it is not a dotted name.
    pub async fn query_host(&self, code: &CountryCode, host: &str) -> Option<HostRecord> {
        if !host.contains('.') {
            debug!("{code}: skipping '{host}', not a host name");
            return None;
        }
        match self.client.query(host).await {
            Ok(record) => Some(record.with_country(code.name())),
            Err(e) => {
                warn!("{code}: {e}");
                None
            }
        }
    }

    /// Run a full harvest of `tier`.
    ///
    /// Every configured code is present in the result. Detail pages and hosts
    /// are visited one at a time, in code order and then discovery order.
    ///
    /// # Errors
    ///
    /// Only a failure to obtain the listing aborts the harvest; per-page and
    /// per-host failures become `None` entries.
    pub async fn harvest(&self, tier: Tier) -> Result<Harvest, FetchError> {
        let context = self.discover(tier).await?;
        let mut harvest = Harvest::new();
        for (code, links) in context.iter() {
            let mut entries = Vec::with_capacity(links.len());
            for link in links {
                let record = match self.hostname(link).await {
                    Some(host) => self.query_host(code, &host).await,
                    None => None,
                };
                entries.push(record);
            }
            harvest.insert(code.clone(), entries);
        }
        Ok(harvest)
    }
}
