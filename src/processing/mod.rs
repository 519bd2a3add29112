//! Prefix processing logic.
//!
//! This module contains the aggregation pipeline:
//! - [`collect`] - Raw token collection and batch parsing
//! - [`dedup`] - De-duplication and family partitioning
//! - [`collapse`] - Merging sorted prefixes into a minimal set
//! - [`aggregate`] - The end to end aggregation entry points

mod aggregate;
mod collapse;
mod collect;
mod dedup;

// Re-export public functions
pub use aggregate::{aggregate, summarize, AggregationResult, Summary};
pub use collapse::collapse;
pub use collect::{parse_all, CidrSet, ParseReport};
pub use dedup::{de_duplicate_networks, partition_by_family};
