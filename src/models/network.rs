//! IPv4/IPv6 network prefixes in CIDR notation.
//!
//! Provides [`Network`], a masked prefix tagged by its [`Family`], together
//! with the CIDR text parser and the bit arithmetic the aggregator needs.
//! Addresses of both families are held in a `u128`; IPv4 uses the low 32 bits.

use crate::error::{ParseError, ParseErrorKind};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Maximum prefix length for IPv4 (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;
/// Maximum prefix length for IPv6 (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// Address family of a [`Network`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Address width in bits, which is also the longest valid prefix.
    pub fn max_length(self) -> u8 {
        match self {
            Family::V4 => MAX_LENGTH_V4,
            Family::V6 => MAX_LENGTH_V6,
        }
    }

    /// Highest address of the family.
    pub fn max_address(self) -> u128 {
        match self {
            Family::V4 => u128::from(u32::MAX),
            Family::V6 => u128::MAX,
        }
    }

    pub fn of(addr: &IpAddr) -> Family {
        match addr {
            IpAddr::V4(_) => Family::V4,
            IpAddr::V6(_) => Family::V6,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// Mask with the lowest `count` bits set.
fn low_bits(count: u32) -> u128 {
    if count == 0 {
        0
    } else {
        u128::MAX >> (128 - count)
    }
}

/// Convert a prefix length to a netmask for the given family.
///
/// # Examples
/// ```
/// use asn_cidr_summary::models::{get_cidr_mask, Family};
/// assert_eq!(get_cidr_mask(Family::V4, 24), Some(0xFFFF_FF00));
/// assert_eq!(get_cidr_mask(Family::V4, 33), None);
/// ```
pub fn get_cidr_mask(family: Family, len: u8) -> Option<u128> {
    let host_bits = family.max_length().checked_sub(len)?;
    Some(family.max_address() & !low_bits(u32::from(host_bits)))
}

/// Turn an address into its integer form.
pub fn addr_bits(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(v4) => u128::from(u32::from(v4)),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

/// Turn an integer back into an address of `family`.
///
/// IPv4 keeps only the low 32 bits.
pub fn bits_addr(family: Family, bits: u128) -> IpAddr {
    match family {
        Family::V4 => IpAddr::V4(Ipv4Addr::from((bits & Family::V4.max_address()) as u32)),
        Family::V6 => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// A network prefix whose host bits are always zero.
///
/// Field order gives the canonical ordering: family, then base address, then
/// prefix length with the shorter (wider) prefix first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Network {
    family: Family,
    base: u128,
    prefix_len: u8,
}

impl Network {
    /// Build a network from an address and prefix length, masking host bits.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Network, ParseErrorKind> {
        let family = Family::of(&addr);
        let mask = get_cidr_mask(family, prefix_len).ok_or(
            ParseErrorKind::PrefixLengthOutOfRange {
                length: u32::from(prefix_len),
                max: family.max_length(),
            },
        )?;
        Ok(Network {
            family,
            base: addr_bits(addr) & mask,
            prefix_len,
        })
    }

    /// Parse CIDR text such as `"10.0.0.0/24"` or `"2001:db8::/32"`.
    ///
    /// A missing `/len` means a host route. Host bits are dropped rather than
    /// rejected, so `"10.0.0.7/24"` becomes `10.0.0.0/24`.
    pub fn parse(text: &str) -> Result<Network, ParseError> {
        parse_cidr(text.trim()).map_err(|kind| ParseError::new(text, kind))
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// First address of the network as an integer.
    pub fn base(&self) -> u128 {
        self.base
    }

    /// Last address of the network as an integer.
    pub fn last(&self) -> u128 {
        self.base | self.host_mask()
    }

    /// Get the lowest (network) address.
    pub fn lo(&self) -> IpAddr {
        bits_addr(self.family, self.base)
    }

    /// Get the highest (broadcast) address.
    pub fn hi(&self) -> IpAddr {
        bits_addr(self.family, self.last())
    }

    fn host_mask(&self) -> u128 {
        low_bits(u32::from(self.family.max_length() - self.prefix_len))
    }

    /// Number of addresses covered, `None` for the whole IPv6 space.
    pub fn size(&self) -> Option<u128> {
        self.host_mask().checked_add(1)
    }

    /// True when `other` lies entirely inside this network.
    ///
    /// Networks of different families never contain each other.
    pub fn contains(&self, other: &Network) -> bool {
        self.family == other.family && self.base <= other.base && other.last() <= self.last()
    }

    /// True when the two ranges share at least one address.
    pub fn overlaps(&self, other: &Network) -> bool {
        self.family == other.family && self.base <= other.last() && other.base <= self.last()
    }

    /// The enclosing network one bit shorter, `None` at `/0`.
    pub fn supernet(&self) -> Option<Network> {
        let prefix_len = self.prefix_len.checked_sub(1)?;
        let mask = get_cidr_mask(self.family, prefix_len)?;
        Some(Network {
            family: self.family,
            base: self.base & mask,
            prefix_len,
        })
    }

    /// Merge two sibling blocks into their common parent.
    ///
    /// Siblings share family and prefix length, differ only in their last
    /// significant bit, and together fill the parent exactly.
    pub fn merge_sibling(&self, other: &Network) -> Option<Network> {
        if self.family != other.family
            || self.prefix_len != other.prefix_len
            || self.base == other.base
        {
            return None;
        }
        let parent = self.supernet()?;
        (other.supernet() == Some(parent)).then_some(parent)
    }
}

fn parse_cidr(text: &str) -> Result<Network, ParseErrorKind> {
    if text.is_empty() {
        return Err(ParseErrorKind::Empty);
    }
    let (addr_text, len_text) = match text.split_once('/') {
        Some((_, rest)) if rest.contains('/') => return Err(ParseErrorKind::TooManySeparators),
        Some((addr, len)) => (addr, Some(len)),
        None => (text, None),
    };

    let family = if addr_text.contains(':') {
        Family::V6
    } else {
        Family::V4
    };
    let addr = match family {
        Family::V4 => Ipv4Addr::from_str(addr_text).map(IpAddr::V4),
        Family::V6 => Ipv6Addr::from_str(addr_text).map(IpAddr::V6),
    }
    .map_err(|_| ParseErrorKind::InvalidAddress(family))?;

    let prefix_len = match len_text {
        Some(len) => parse_prefix_length(len, family)?,
        None => family.max_length(),
    };

    let network = Network::new(addr, prefix_len)?;
    if network.lo() != addr {
        log::debug!("host bits set in '{text}', normalized to {network}");
    }
    Ok(network)
}

fn parse_prefix_length(text: &str, family: Family) -> Result<u8, ParseErrorKind> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseErrorKind::InvalidPrefixLength(text.to_string()));
    }
    let length = u32::from_str(text)
        .map_err(|_| ParseErrorKind::InvalidPrefixLength(text.to_string()))?;
    let max = family.max_length();
    if length > u32::from(max) {
        return Err(ParseErrorKind::PrefixLengthOutOfRange { length, max });
    }
    Ok(length as u8)
}

impl FromStr for Network {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Network, ParseError> {
        Network::parse(s)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.lo(), self.prefix_len)
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Network, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Network::parse(&s).map_err(de::Error::custom)
    }
}
