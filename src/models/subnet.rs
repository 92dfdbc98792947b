//! Derived subnet record.

use super::ipv4::{Cidr, MAX_LENGTH};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Everything derivable from one CIDR block.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetInfo {
    /// Canonical CIDR (network address + prefix).
    pub cidr: Cidr,
    pub network: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    pub first_host: Ipv4Addr,
    pub last_host: Ipv4Addr,
    /// 2^(32-prefix); 2^32 for a /0.
    pub total_hosts: u64,
    pub usable_hosts: u64,
    pub subnet_mask: Ipv4Addr,
    pub wildcard_mask: Ipv4Addr,
    pub prefix: u8,
    pub can_split: bool,
    /// Lower and upper half, present once the block has been split.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Box<[SubnetInfo; 2]>>,
}

/// Parse "address/prefix" and derive the full [`SubnetInfo`].
///
/// # Examples
/// ```
/// use cidr_planner::models::calculate_subnet;
/// let info = calculate_subnet("192.168.1.77/24").unwrap();
/// assert_eq!(info.cidr.to_string(), "192.168.1.0/24");
/// assert_eq!(info.usable_hosts, 254);
/// ```
pub fn calculate_subnet(cidr: &str) -> Result<SubnetInfo> {
    Cidr::parse(cidr).map(SubnetInfo::from_cidr)
}

impl SubnetInfo {
    /// Derive the record for an already parsed block.
    ///
    /// /31 follows RFC 3021: both addresses are usable. /32 is a single host.
    pub fn from_cidr(cidr: Cidr) -> SubnetInfo {
        let prefix = cidr.prefix();
        let mask = cidr.mask();
        let network = cidr.first();
        let broadcast = cidr.last();
        let total_hosts = cidr.size();

        let (first_host, last_host, usable_hosts) = match prefix {
            32 => (network, network, 1),
            31 => (network, broadcast, 2),
            _ => (network + 1, broadcast - 1, total_hosts - 2),
        };

        SubnetInfo {
            cidr: cidr.canonical(),
            network: Ipv4Addr::from(network),
            broadcast: Ipv4Addr::from(broadcast),
            first_host: Ipv4Addr::from(first_host),
            last_host: Ipv4Addr::from(last_host),
            total_hosts,
            usable_hosts,
            subnet_mask: Ipv4Addr::from(mask),
            wildcard_mask: Ipv4Addr::from(!mask),
            prefix,
            can_split: prefix < MAX_LENGTH,
            children: None,
        }
    }

    pub fn is_split(&self) -> bool {
        self.children.is_some()
    }
}
