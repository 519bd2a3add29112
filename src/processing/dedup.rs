//! Network de-duplication and family partitioning.

use crate::models::{Family, Network};
use itertools::{Either, Itertools};

/// De-duplicate networks by family, base address and prefix length.
///
/// The result is in canonical order: IPv4 before IPv6, then base address
/// ascending, then the shorter prefix first.
///
/// # Arguments
/// * `networks` - Parsed networks, in any order, possibly repeated
///
/// # Returns
/// * Sorted networks with every duplicate removed
pub fn de_duplicate_networks(mut networks: Vec<Network>) -> Vec<Network> {
    let original_count = networks.len();

    // Dedup - must be sorted first
    networks.sort_unstable();
    networks.dedup();

    let removed = original_count - networks.len();
    if removed > 0 {
        log::debug!("Removed {removed} duplicate networks, {} left", networks.len());
    }
    networks
}

/// Split networks into `(ipv4, ipv6)`, keeping their relative order.
pub fn partition_by_family<I>(networks: I) -> (Vec<Network>, Vec<Network>)
where
    I: IntoIterator<Item = Network>,
{
    networks
        .into_iter()
        .partition_map(|network| match network.family() {
            Family::V4 => Either::Left(network),
            Family::V6 => Either::Right(network),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nets(list: &[&str]) -> Vec<Network> {
        list.iter().map(|s| Network::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_de_duplicate_networks() {
        let result = de_duplicate_networks(nets(&[
            "10.0.1.0/24",
            "10.0.0.0/24",
            "10.0.0.9/24",
            "10.0.0.0/24",
            "10.0.0.0/8",
        ]));
        assert_eq!(result, nets(&["10.0.0.0/8", "10.0.0.0/24", "10.0.1.0/24"]));
    }

    #[test]
    fn test_de_duplicate_networks_empty() {
        assert!(de_duplicate_networks(Vec::new()).is_empty());
    }

    #[test]
    fn test_partition_by_family() {
        let (v4, v6) = partition_by_family(nets(&[
            "2001:db8::/32",
            "10.0.0.0/8",
            "::/0",
            "0.0.0.0/0",
        ]));
        assert_eq!(v4, nets(&["10.0.0.0/8", "0.0.0.0/0"]));
        assert_eq!(v6, nets(&["2001:db8::/32", "::/0"]));
    }
}
