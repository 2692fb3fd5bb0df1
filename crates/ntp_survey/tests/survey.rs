// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

mod common;

use ntp_survey::error::SurveyError;
use ntp_survey::{Aggregator, QueryClient, SurveyConfig, Tier};

use common::{BASE, StubFetcher, StubTransport, detail_page, listing_row};

const FR_DETAIL: &str = "/bin/view/Servers/NtpExampleFr";

fn config() -> SurveyConfig {
    SurveyConfig::default()
        .with_base_url(BASE)
        .with_well_known_hosts(["time.example.com", "gone.example.com"])
}

fn aggregator(
    fetcher: StubFetcher,
    transport: StubTransport,
) -> Aggregator<StubFetcher, StubTransport> {
    Aggregator::with_parts(config(), fetcher, QueryClient::with_transport(transport)).unwrap()
}

fn sorted_default_codes() -> Vec<&'static str> {
    vec!["ch", "de", "fr", "gb", "ie", "nl", "uk", "us"]
}

#[tokio::test]
async fn tier_one_end_to_end_yields_one_french_record() {
    let fetcher = StubFetcher::default()
        .with_page(Tier::One.path(), listing_row("FR", FR_DETAIL))
        .with_page(FR_DETAIL, detail_page("ntp.example.fr"));
    let transport = StubTransport::default().with_host("ntp.example.fr");

    let report = aggregator(fetcher, transport.clone())
        .run(Tier::One, false)
        .await
        .unwrap();

    assert_eq!(report.tier, 1);
    let codes: Vec<&str> = report.countries.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, sorted_default_codes());

    for country in &report.countries {
        if country.code.as_str() == "fr" {
            assert_eq!(country.name, Some("France"));
            assert_eq!(country.entries.len(), 1);
            let record = country.entries[0].as_ref().expect("France record missing");
            assert_eq!(record.host, "ntp.example.fr");
            assert_eq!(record.country.as_deref(), Some("France"));
            assert_eq!(record.attributes.stratum, 1);
            assert_eq!(record.attributes.ref_id, "GPS");
        } else {
            assert!(country.entries.is_empty(), "{} should be empty", country.code);
        }
    }
    assert!(report.well_known.is_empty());
    assert_eq!(*transport.resolved.lock().unwrap(), ["ntp.example.fr"]);
}

#[tokio::test]
async fn every_code_is_present_for_both_tiers() {
    for tier in [Tier::One, Tier::Two] {
        let fetcher = StubFetcher::default().with_page(tier.path(), "<html>no rows</html>");
        let report = aggregator(fetcher, StubTransport::default())
            .run(tier, false)
            .await
            .unwrap();
        let codes: Vec<&str> = report.countries.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, sorted_default_codes(), "tier {tier}");
        assert!(report.countries.iter().all(|c| c.entries.is_empty()));
    }
}

#[tokio::test]
async fn tier_two_reads_its_own_listing() {
    let fetcher = StubFetcher::default()
        .with_page(Tier::Two.path(), listing_row("CH", "/bin/view/Servers/Zurich"))
        .with_page("/bin/view/Servers/Zurich", detail_page("ntp.example.ch"));
    let requests = fetcher.requests.clone();
    let transport = StubTransport::default().with_host("ntp.example.ch");

    let report = aggregator(fetcher, transport).run(Tier::Two, false).await.unwrap();

    let ch = &report.countries[0];
    assert_eq!(ch.code.as_str(), "ch");
    assert_eq!(ch.name, Some("Switzerland"));
    assert!(ch.entries[0].is_some());
    assert_eq!(
        requests.lock().unwrap()[0],
        format!("{BASE}/bin/view/Servers/StratumTwoTimeServers")
    );
}

#[tokio::test]
async fn dotless_hostname_is_never_queried() {
    let fetcher = StubFetcher::default()
        .with_page(Tier::One.path(), listing_row("DE", "/bin/view/Servers/Local"))
        .with_page("/bin/view/Servers/Local", detail_page("localhost"));
    let transport = StubTransport::default().with_host("localhost");

    let report = aggregator(fetcher, transport.clone())
        .run(Tier::One, false)
        .await
        .unwrap();

    let de = report.countries.iter().find(|c| c.code.as_str() == "de").unwrap();
    assert_eq!(de.entries.len(), 1);
    assert!(de.entries[0].is_none());
    assert!(transport.resolved.lock().unwrap().is_empty());
    assert!(transport.exchanged.lock().unwrap().is_empty());
}

#[tokio::test]
async fn page_and_host_failures_become_absent_entries() {
    let listing = [
        listing_row("NL", "/bin/view/Servers/Missing"),
        listing_row("NL", "/bin/view/Servers/NoLabel"),
        listing_row("NL", "/bin/view/Servers/Unresolvable"),
        listing_row("NL", "/bin/view/Servers/Good"),
    ]
    .join("\n");
    let fetcher = StubFetcher::default()
        .with_page(Tier::One.path(), listing)
        .with_page("/bin/view/Servers/NoLabel", "<p>under maintenance</p>")
        .with_page("/bin/view/Servers/Unresolvable", detail_page("ntp.gone.example.nl"))
        .with_page("/bin/view/Servers/Good", detail_page("ntp.example.nl"));
    let transport = StubTransport::default().with_host("ntp.example.nl");

    let report = aggregator(fetcher, transport.clone())
        .run(Tier::One, false)
        .await
        .unwrap();

    let nl = report.countries.iter().find(|c| c.code.as_str() == "nl").unwrap();
    assert_eq!(nl.entries.len(), 4);
    assert!(nl.entries[..3].iter().all(Option::is_none));
    assert_eq!(nl.entries[3].as_ref().unwrap().host, "ntp.example.nl");
    // Resolution failure must not reach the wire.
    assert_eq!(transport.exchanged.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn unregistered_code_gets_records_without_country_name() {
    let fetcher = StubFetcher::default()
        .with_page(Tier::One.path(), listing_row("UK", "/bin/view/Servers/London"))
        .with_page("/bin/view/Servers/London", detail_page("ntp.example.co.uk"));
    let transport = StubTransport::default().with_host("ntp.example.co.uk");

    let report = aggregator(fetcher, transport).run(Tier::One, false).await.unwrap();

    let uk = report.countries.iter().find(|c| c.code.as_str() == "uk").unwrap();
    assert_eq!(uk.name, None);
    let record = uk.entries[0].as_ref().unwrap();
    assert_eq!(record.country, None);
}

#[tokio::test]
async fn listing_failure_still_queries_well_known_hosts() {
    let transport = StubTransport::default().with_host("time.example.com");

    let report = aggregator(StubFetcher::default(), transport)
        .run(Tier::One, true)
        .await
        .unwrap();

    let listing_error = report.listing_error.as_deref().expect("listing error missing");
    assert!(listing_error.contains("404"), "{listing_error}");
    let codes: Vec<&str> = report.countries.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes, sorted_default_codes());
    assert!(report.countries.iter().all(|c| c.entries.is_empty()));

    assert_eq!(report.well_known.len(), 2);
    let (host, record) = &report.well_known[0];
    assert_eq!(host, "time.example.com");
    assert_eq!(record.as_ref().unwrap().attributes.ref_id, "GPS");
    assert_eq!(report.well_known[1], ("gone.example.com".to_owned(), None));
}

#[tokio::test]
async fn listing_error_is_absent_on_success() {
    let fetcher = StubFetcher::default().with_page(Tier::One.path(), "");
    let report = aggregator(fetcher, StubTransport::default())
        .run(Tier::One, false)
        .await
        .unwrap();
    assert!(report.listing_error.is_none());
}

#[tokio::test]
async fn extra_sources_are_queried_without_country() {
    let fetcher = StubFetcher::default().with_page(Tier::One.path(), "");
    let transport = StubTransport::default().with_host("time.example.com");

    let report = aggregator(fetcher, transport).run(Tier::One, true).await.unwrap();

    assert_eq!(report.well_known.len(), 2);
    let (host, record) = &report.well_known[0];
    assert_eq!(host, "time.example.com");
    assert_eq!(record.as_ref().unwrap().country, None);
    assert_eq!(report.well_known[1], ("gone.example.com".to_owned(), None));

    let mut out = Vec::new();
    report.render(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Country: Switzerland (ch)\n"));
    assert!(text.contains("Country: unknown (uk)\n"));
    assert!(text.contains("Well-known sources:\n  time.example.com offset=+0.000123"));
    assert!(text.ends_with("  gone.example.com (no record)\n"));
}

#[test]
fn invalid_base_url_is_rejected() {
    let config = SurveyConfig::default().with_base_url("::not a url::");
    let result = Aggregator::with_parts(
        config,
        StubFetcher::default(),
        QueryClient::with_transport(StubTransport::default()),
    );
    assert!(matches!(result, Err(SurveyError::InvalidConfig(_))));
}
