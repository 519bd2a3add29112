//! Error types for CIDR parsing and prefix aggregation.

use crate::models::{Family, Network};
use thiserror::Error;

/// A CIDR token that could not be turned into a [`Network`].
///
/// Carries the offending text unchanged so callers can report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid CIDR '{text}': {kind}")]
pub struct ParseError {
    pub text: String,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(text: &str, kind: ParseErrorKind) -> ParseError {
        ParseError {
            text: text.to_string(),
            kind,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("empty input")]
    Empty,
    #[error("more than one '/' separator")]
    TooManySeparators,
    #[error("not a valid {0} address")]
    InvalidAddress(Family),
    #[error("prefix length '{0}' is not a decimal number")]
    InvalidPrefixLength(String),
    #[error("prefix length {length} is longer than {max}")]
    PrefixLengthOutOfRange { length: u32, max: u8 },
}

/// Contract violations while collapsing a sorted sequence.
///
/// Neither can happen when networks are partitioned by family first, so
/// [`crate::processing::aggregate`] treats them as bugs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("{network} does not belong in a {expected} sequence")]
    FamilyMismatch { expected: Family, network: Network },
    #[error("{current} and {next} overlap without one containing the other")]
    PartialOverlap { current: Network, next: Network },
}
