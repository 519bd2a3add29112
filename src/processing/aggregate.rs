//! Prefix aggregation: de-duplicate, partition, sort and collapse.

use super::collapse::collapse;
use super::collect::{parse_all, ParseReport};
use super::dedup::{de_duplicate_networks, partition_by_family};
use crate::error::ParseError;
use crate::models::{Family, Network};
use serde::{Deserialize, Serialize};

/// Canonical CIDR strings per family, minimal and ordered.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct AggregationResult {
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        self.ipv4.len() + self.ipv6.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }
}

/// Collapse networks into the smallest set covering exactly the same addresses.
///
/// Never fails: IPv4 and IPv6 are split before collapsing, so the family
/// checks in [`collapse`] cannot trip.
pub fn aggregate<I>(networks: I) -> AggregationResult
where
    I: IntoIterator<Item = Network>,
{
    let networks = de_duplicate_networks(networks.into_iter().collect());
    let (ipv4, ipv6) = partition_by_family(networks);

    AggregationResult {
        ipv4: collapse_family(Family::V4, &ipv4),
        ipv6: collapse_family(Family::V6, &ipv6),
    }
}

fn collapse_family(family: Family, networks: &[Network]) -> Vec<String> {
    let collapsed = collapse(family, networks)
        .unwrap_or_else(|e| panic!("Family partitioning let through bad input: {e}"));
    log::debug!(
        "{family}: collapsed {} networks into {}",
        networks.len(),
        collapsed.len()
    );
    collapsed.iter().map(Network::to_string).collect()
}

/// Outcome of a full run over raw tokens.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub result: AggregationResult,
    /// Number of tokens that parsed.
    pub accepted: usize,
    pub skipped: Vec<ParseError>,
}

/// Parse raw CIDR tokens and aggregate the valid ones.
pub fn summarize<I, S>(tokens: I) -> Summary
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ParseReport { networks, errors } = parse_all(tokens);
    let accepted = networks.len();
    let result = aggregate(networks);
    log::info!(
        "Aggregated {accepted} networks into {} IPv4 and {} IPv6 prefixes, skipped {} tokens",
        result.ipv4.len(),
        result.ipv6.len(),
        errors.len()
    );
    Summary {
        result,
        accepted,
        skipped: errors,
    }
}
