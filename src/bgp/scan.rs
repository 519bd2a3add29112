//! Discovery and extraction: organisation names to raw CIDR tokens.

use crate::processing::CidrSet;
use colored::Colorize;
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::collections::{BTreeMap, HashSet};
use std::error::Error;

/// Where ASNs and their announced prefixes come from.
#[allow(async_fn_in_trait)]
pub trait PrefixSource {
    /// ASN identifiers (e.g. `AS45102`) matching an organisation query.
    async fn search_asns(&self, query: &str) -> Result<Vec<String>, Box<dyn Error>>;

    /// Raw prefix tokens announced by one ASN.
    async fn asn_prefixes(&self, asn: &str) -> Result<Vec<String>, Box<dyn Error>>;
}

/// Everything collected by [`scan`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub cidrs: CidrSet,
    /// Tokens returned per ASN.
    pub asns: BTreeMap<String, usize>,
    /// Queries and ASNs that could not be retrieved.
    pub failed: Vec<String>,
}

/// Look up every query, then fetch each ASN's prefixes at most once.
///
/// Up to `max_concurrent` ASN pages are requested at a time. A failing query
/// or ASN is logged and recorded in [`ScanReport::failed`]; the scan goes on.
pub async fn scan<S: PrefixSource>(
    source: &S,
    queries: &[String],
    max_concurrent: usize,
) -> ScanReport {
    let mut report = ScanReport::default();
    // Every ASN attempted so far, successful or not.
    let mut seen: HashSet<String> = HashSet::new();

    for query in queries {
        log::info!("Searching ISP: {}", query.bold());
        let asns = match source.search_asns(query).await {
            Ok(asns) => asns,
            Err(e) => {
                log::error!("Search for '{query}' failed: {e}");
                report.failed.push(query.clone());
                continue;
            }
        };
        let asns: Vec<String> = asns
            .into_iter()
            .filter(|asn| seen.insert(asn.clone()))
            .collect();
        log::info!("'{query}': {} new ASNs {}", asns.len(), asns.iter().join(" "));

        let mut fetches = stream::iter(asns)
            .map(|asn| async move {
                let result = source.asn_prefixes(&asn).await;
                (asn, result)
            })
            .buffer_unordered(max_concurrent.max(1));

        while let Some((asn, result)) = fetches.next().await {
            match result {
                Ok(cidrs) => {
                    log::info!("ASN: {asn} -> {} CIDRs", cidrs.len());
                    report.cidrs.extend(&cidrs);
                    report.asns.insert(asn, cidrs.len());
                }
                Err(e) => {
                    log::warn!("Skipping {asn}: {e}");
                    report.failed.push(asn);
                }
            }
        }
        log::info!("{}", "-".repeat(40));
    }

    log::info!(
        "Scan done: {} ASNs, {} unique tokens, {} failures",
        report.asns.len(),
        report.cidrs.len(),
        report.failed.len()
    );
    report
}
