// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
Survey of public NTP servers listed in the `support.ntp.org` directory.

A survey run fetches the tier-one or tier-two listing, picks the rows that
mention each configured country, follows every row to its detail page to learn
the advertised host name, and queries that host once. Optionally a fixed list
of widely used sources is queried as well. Fetch and query failures never
abort a run: they show up as absent entries in the [`Report`], and an
unreachable listing is recorded in `Report::listing_error`.

Independently, [`MetricsCollector`] reads clock-quality variables from the
local daemon through `ntpq`.

# Example

```rust,no_run
use ntp_survey::{Aggregator, SurveyConfig, Tier};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let aggregator = Aggregator::new(SurveyConfig::default().with_countries(&["fr"]))?;
    let report = aggregator.run(Tier::One, false).await?;
    report.render(&mut std::io::stdout())?;
    Ok(())
}
```
*/

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use ntp_survey_client::{ClockAttributes, HostRecord, QueryClient, QueryConfig, QueryError};

/// Survey and metrics settings.
pub mod config;

/// Country codes and the name registry.
pub mod country;

/// Row and label matchers for directory pages.
pub mod directory;

/// Error types.
pub mod error;

/// Page retrieval.
pub mod fetch;

/// Listing discovery and per-host queries.
pub mod harvest;

/// Local daemon metrics.
pub mod metrics;

/// Survey driver and output.
pub mod report;

pub use config::{MetricsConfig, SurveyConfig};
pub use country::{CountryCode, lookup};
pub use error::{FetchError, MetricsError, SurveyError};
pub use fetch::{HttpFetcher, PageFetcher};
pub use harvest::{Harvest, HarvestContext, Harvester, Tier};
pub use metrics::{ControlQuery, MetricSample, MetricsCollector, Ntpq};
pub use report::{Aggregator, CountryReport, Report};
