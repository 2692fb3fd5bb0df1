// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

/*!
One-shot NTP query client for surveying public time servers.

A query resolves a host name, performs exactly one NTPv4 exchange, and turns the
reply into a [`HostRecord`] with a fixed set of clock-quality attributes. Name
resolution, exchange and reference-identifier decoding fail with distinct
[`QueryError`] variants.

# Example

```rust,no_run
use ntp_survey_client::QueryClient;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let client = QueryClient::new();
    match client.query("time.cloudflare.com").await {
        Ok(record) => println!("{record}"),
        Err(e) => eprintln!("{e}"),
    }
}
```
*/

#![warn(missing_docs)]

// Re-export protocol types from ntp_survey_proto for convenience.
pub use ntp_survey_proto::{protocol, refid, unix_time};

/// Error types for queries and reply validation.
pub mod error;

/// Host record types.
pub mod record;

/// Packet construction and reply validation helpers.
pub mod request;

/// The transport primitive and its UDP implementation.
pub mod transport;

mod query;

pub use error::QueryError;
pub use query::{QueryClient, QueryConfig};
pub use record::{ClockAttributes, HostRecord};
pub use request::NtpResult;
pub use transport::{Transport, UdpTransport};
