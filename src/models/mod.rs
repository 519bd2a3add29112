//! Domain models for prefix aggregation.
//!
//! - [`Network`] - a masked IPv4 or IPv6 prefix
//! - [`Family`] - the address family tag used to keep IPv4 and IPv6 apart

mod network;

// Re-export public types
pub use network::{
    addr_bits, bits_addr, get_cidr_mask, Family, Network, MAX_LENGTH_V4, MAX_LENGTH_V6,
};
