//! Binary subnet splitting.

use crate::error::{CidrError, Result};
use crate::models::{Cidr, SubnetInfo, MAX_LENGTH};
use std::net::Ipv4Addr;

/// Upper bound on the number of nodes in one subnet tree.
pub const MAX_TREE_NODES: usize = 10_000;

/// Split a block into its lower and upper halves.
///
/// `current_tree_size` is the node count of the tree `subnet` belongs to; the
/// split is refused once that reaches [`MAX_TREE_NODES`]. The check runs
/// before splitting, so a split accepted at `MAX_TREE_NODES - 1` leaves the
/// tree one node over the cap, and the next split fails.
pub fn split_subnet(subnet: &SubnetInfo, current_tree_size: usize) -> Result<[SubnetInfo; 2]> {
    if subnet.prefix >= MAX_LENGTH {
        return Err(CidrError::CannotSplit(subnet.cidr.to_string()));
    }
    if current_tree_size >= MAX_TREE_NODES {
        return Err(CidrError::TreeSizeLimitExceeded {
            size: current_tree_size,
            limit: MAX_TREE_NODES,
        });
    }

    let child_prefix = subnet.prefix + 1;
    let half = 1u32 << (MAX_LENGTH - child_prefix);
    let lower = u32::from(subnet.network);
    // lower + half stays inside the parent, so cannot overflow
    let upper = lower + half;

    log::trace!("split {} into /{child_prefix} halves", subnet.cidr);

    Ok([
        SubnetInfo::from_cidr(Cidr::new(Ipv4Addr::from(lower), child_prefix)?),
        SubnetInfo::from_cidr(Cidr::new(Ipv4Addr::from(upper), child_prefix)?),
    ])
}
