//! bgp.he.net discovery and prefix extraction.
//!
//! This module handles everything that talks to the outside world:
//! - [`client`] - HTTP retrieval with retries
//! - [`cache`] - On-disk cache of ASN prefix pages
//! - [`scrape`] - Pulling ASN and prefix links out of the HTML
//! - [`scan`] - Driving searches and ASN lookups into a [`crate::processing::CidrSet`]

mod cache;
mod client;
mod scan;
mod scrape;

// Re-export public types and functions
pub use cache::PageCache;
pub use client::{asn_url, search_url, HeNetClient, HE_BASE_URL};
pub use scan::{scan, PrefixSource, ScanReport};
pub use scrape::{extract_asns, extract_prefixes};
