//! Overlapping CIDR detection.

use crate::models::Cidr;
use itertools::Itertools;

/// Two blocks that share at least one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapConflict {
    pub first: Cidr,
    pub second: Cidr,
}

/// Find every overlapping pair among `blocks`.
///
/// # Returns
/// Conflicts in input order of their first member, empty when all blocks are
/// pairwise disjoint.
pub fn find_overlaps(blocks: &[Cidr]) -> Vec<OverlapConflict> {
    blocks
        .iter()
        .tuple_combinations()
        .filter(|(a, b)| a.overlaps(b))
        .map(|(a, b)| OverlapConflict {
            first: *a,
            second: *b,
        })
        .collect()
}

/// True when no two blocks overlap.
///
/// Sorts a copy by start address and compares neighbours, so large inputs
/// avoid the pairwise scan.
pub fn all_disjoint(blocks: &[Cidr]) -> bool {
    blocks
        .iter()
        .sorted_by_key(|c| (c.first(), c.last()))
        .tuple_windows()
        .all(|(a, b)| a.last() < b.first())
}
