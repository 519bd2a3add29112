//! Raw CIDR token collection and batch parsing.

use crate::error::ParseError;
use crate::models::Network;
use std::collections::BTreeSet;

/// Raw CIDR tokens gathered during a scan, de-duplicated by literal text.
///
/// Tokens are stored exactly as given; malformed ones stay in the set so
/// [`parse_all`] can report them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CidrSet {
    tokens: BTreeSet<String>,
}

impl CidrSet {
    pub fn new() -> CidrSet {
        CidrSet::default()
    }

    /// Add a token, returning `false` if the exact text was already present.
    pub fn insert(&mut self, token: &str) -> bool {
        self.tokens.insert(token.to_string())
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> Extend<S> for CidrSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for CidrSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> CidrSet {
        let mut set = CidrSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a CidrSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

/// Networks parsed from a batch, alongside the tokens that were rejected.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub networks: Vec<Network>,
    pub errors: Vec<ParseError>,
}

/// Parse every token, keeping going past malformed ones.
///
/// Each rejected token is logged and returned in [`ParseReport::errors`] in
/// input order.
pub fn parse_all<I, S>(tokens: I) -> ParseReport
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ParseReport::default();
    for token in tokens {
        match Network::parse(token.as_ref()) {
            Ok(network) => report.networks.push(network),
            Err(e) => {
                log::warn!("Skipping token: {e}");
                report.errors.push(e);
            }
        }
    }
    log::debug!(
        "parse_all() parsed {} networks, skipped {}",
        report.networks.len(),
        report.errors.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseErrorKind;
    use crate::models::Family;

    #[test]
    fn test_cidr_set_literal_dedup() {
        let mut set = CidrSet::new();
        assert!(set.insert("10.0.0.0/24"));
        assert!(!set.insert("10.0.0.0/24"));
        // Same network, different text: the aggregator handles this one.
        assert!(set.insert("10.0.0.7/24"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_cidr_set_ordered() {
        let set: CidrSet = vec!["b", "a", "c", "a"].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_cidr_set_keeps_malformed() {
        let set: CidrSet = ["", "junk"].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(parse_all(&set).errors.len(), 2);
    }

    #[test]
    fn test_parse_all_continues_past_errors() {
        let report = parse_all(["10.0.0.0/24", "not-a-cidr", "2001:db8::/32", "1.2.3.4/40"]);
        assert_eq!(report.networks.len(), 2);
        assert_eq!(report.networks[0].family(), Family::V4);
        assert_eq!(report.networks[1].family(), Family::V6);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].text, "not-a-cidr");
        assert_eq!(report.errors[1].text, "1.2.3.4/40");
        assert_eq!(
            report.errors[1].kind,
            ParseErrorKind::PrefixLengthOutOfRange { length: 40, max: 32 }
        );
    }

    #[test]
    fn test_parse_all_empty() {
        let report = parse_all(Vec::<String>::new());
        assert!(report.networks.is_empty());
        assert!(report.errors.is_empty());
    }
}
