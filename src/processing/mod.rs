//! Subnet processing on top of the models.
//!
//! - [`split`] - binary splitting with a bounded tree size
//! - [`tree`] - tree counting, traversal and the owned [`SubnetTree`]
//! - [`overlap`] - overlap detection between blocks

mod overlap;
mod split;
mod tree;

// Re-export public functions
pub use overlap::{all_disjoint, find_overlaps, OverlapConflict};
pub use split::{split_subnet, MAX_TREE_NODES};
pub use tree::{collect_all, collect_visible, count_nodes, SubnetTree};
