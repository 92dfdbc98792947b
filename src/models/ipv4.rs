//! IPv4 address and CIDR notation utilities.
//!
//! Provides [`Cidr`] for representing address blocks, along with the bit-level
//! helpers (mask math, integer conversion, range predicates) everything else
//! is built on.

use crate::error::{CidrError, Result};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Parse a dotted-decimal address. Exactly four decimal components, each 0-255.
pub fn parse_address(s: &str) -> Result<Ipv4Addr> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 4 {
        return Err(CidrError::InvalidAddress(s.to_string()));
    }
    let mut octets = [0u8; 4];
    for (octet, part) in octets.iter_mut().zip(parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CidrError::InvalidAddress(s.to_string()));
        }
        *octet = part
            .parse::<u8>()
            .map_err(|_| CidrError::InvalidAddress(s.to_string()))?;
    }
    Ok(Ipv4Addr::from(octets))
}

/// Convert a dotted-decimal string to its big-endian 32-bit value.
///
/// # Examples
/// ```
/// use cidr_planner::models::address_to_int;
/// assert_eq!(address_to_int("192.168.1.1").unwrap(), 0xC0A80101);
/// ```
pub fn address_to_int(s: &str) -> Result<u32> {
    parse_address(s).map(u32::from)
}

/// Convert a 32-bit value back to dotted-decimal.
pub fn int_to_address(bits: u32) -> String {
    Ipv4Addr::from(bits).to_string()
}

/// Parse the prefix half of a CIDR string.
pub fn parse_prefix(s: &str) -> Result<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CidrError::InvalidPrefix(s.to_string()));
    }
    match s.parse::<u8>() {
        Ok(len) if len <= MAX_LENGTH => Ok(len),
        _ => Err(CidrError::InvalidPrefix(s.to_string())),
    }
}

/// Convert a CIDR prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use cidr_planner::models::prefix_to_mask;
/// assert_eq!(prefix_to_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn prefix_to_mask(len: u8) -> Result<u32> {
    Cidr::new(Ipv4Addr::UNSPECIFIED, len).map(|c| c.mask())
}

/// Host-bit mask, the complement of [`prefix_to_mask`].
pub fn wildcard_mask(len: u8) -> Result<u32> {
    prefix_to_mask(len).map(|mask| !mask)
}

/// Count the leading one-bits of a mask.
pub fn mask_to_prefix(mask: u32) -> u8 {
    mask.leading_ones() as u8
}

/// True for addresses inside 10.0.0.0/8, 172.16.0.0/12 or 192.168.0.0/16.
pub fn is_rfc1918(addr: Ipv4Addr) -> bool {
    match addr.octets() {
        [10, ..] => true,
        [172, b, ..] => (16..=31).contains(&b),
        [192, 168, ..] => true,
        _ => false,
    }
}

/// IPv4 address block in CIDR notation.
///
/// The address is kept as given; use [`Cidr::network`] or
/// [`Cidr::canonical`] for the block's lowest address. The prefix is always
/// 0-32: [`Cidr::new`], [`Cidr::parse`] and deserialization are the only
/// constructors.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Cidr {
    addr: Ipv4Addr,
    prefix: u8,
}

impl Cidr {
    /// Build a block from an address and prefix length.
    pub fn new(addr: Ipv4Addr, prefix: u8) -> Result<Cidr> {
        if prefix > MAX_LENGTH {
            return Err(CidrError::InvalidPrefix(prefix.to_string()));
        }
        Ok(Cidr { addr, prefix })
    }

    /// Parse an "address/prefix" string (e.g. "10.0.0.0/24").
    pub fn parse(addr_cidr: &str) -> Result<Cidr> {
        let trimmed = addr_cidr.trim();
        let parts: Vec<&str> = trimmed.split('/').collect();
        if parts.len() != 2 {
            return Err(CidrError::InvalidCidrFormat(addr_cidr.to_string()));
        }
        let addr = parse_address(parts[0])?;
        let prefix = parse_prefix(parts[1])?;
        Ok(Cidr { addr, prefix })
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Same block with the address replaced by its network address.
    pub fn canonical(&self) -> Cidr {
        Cidr {
            addr: self.network(),
            prefix: self.prefix,
        }
    }

    /// Lowest (network) address in the block.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.first())
    }

    /// Highest (broadcast) address in the block.
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.last())
    }

    /// Network mask as an integer.
    pub fn mask(&self) -> u32 {
        let right_len = MAX_LENGTH - self.prefix;
        // Shift in 64 bits; a 32-bit shift by 32 is undefined.
        let all_bits = u32::MAX as u64;
        ((all_bits >> right_len) << right_len) as u32
    }

    /// Lowest address as an integer.
    pub fn first(&self) -> u32 {
        u32::from(self.addr) & self.mask()
    }

    /// Highest address as an integer.
    pub fn last(&self) -> u32 {
        self.first() | !self.mask()
    }

    /// Number of addresses in the block.
    pub fn size(&self) -> u64 {
        1u64 << (MAX_LENGTH - self.prefix)
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let bits = u32::from(addr);
        self.first() <= bits && bits <= self.last()
    }

    /// True when the two blocks share at least one address.
    pub fn overlaps(&self, other: &Cidr) -> bool {
        self.first() <= other.last() && other.first() <= self.last()
    }
}

impl FromStr for Cidr {
    type Err = CidrError;

    fn from_str(s: &str) -> Result<Cidr> {
        Cidr::parse(s)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::parse(&s).map_err(de::Error::custom)
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}
