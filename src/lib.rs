//! Collapse the prefixes announced by an organisation's ASNs into the
//! smallest equivalent IPv4 and IPv6 CIDR lists.

pub mod bgp;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

use bgp::{HeNetClient, PageCache, PrefixSource, ScanReport};
use config::Settings;
use std::error::Error;

pub use error::{AggregateError, ParseError, ParseErrorKind};
pub use models::{Family, Network};
pub use processing::{aggregate, summarize, AggregationResult, CidrSet, Summary};

/// Scan `source` for the configured organisations, aggregate, and write the
/// output files.
pub async fn run_with<S: PrefixSource>(
    source: &S,
    settings: &Settings,
) -> Result<(Summary, ScanReport), Box<dyn Error>> {
    let report = bgp::scan(source, &settings.isps, settings.max_concurrent_fetches).await;
    let summary = summarize(&report.cidrs);

    output::write_result(&summary.result, &settings.output_ipv4, &settings.output_ipv6)?;
    if let Some(path) = &settings.output_json {
        output::write_summary_json(path, &summary)?;
    }
    output::print_summary(&summary, &report);
    Ok((summary, report))
}

/// Full run against bgp.he.net with the on-disk page cache.
pub async fn run(settings: &Settings) -> Result<Summary, Box<dyn Error>> {
    let cache = PageCache::new(&settings.cache_dir, settings.cache_max_age)?;
    let client = HeNetClient::new(cache.clone(), settings.fetch_retries)?;

    let result = run_with(&client, settings).await;

    // Clear even when the run failed, then report the run's own error first.
    if settings.clear_cache_on_exit {
        match (&result, cache.clear()) {
            (Ok(_), Err(e)) => return Err(e),
            (Err(_), Err(e)) => log::error!("{e}"),
            _ => {}
        }
    }
    let (summary, _report) = result?;
    Ok(summary)
}
