//! Domain models.
//!
//! - [`Cidr`] - IPv4 address block with the bit-level helpers behind it
//! - [`SubnetInfo`] - everything derived from one block, plus split children
//! - [`NetworkPlan`] and its parts - generator input and output

mod ipv4;
mod plan;
mod subnet;

// Re-export public types
pub use ipv4::{
    address_to_int, int_to_address, is_rfc1918, mask_to_prefix, parse_address, parse_prefix,
    prefix_to_mask, wildcard_mask, Cidr, MAX_LENGTH,
};
pub use plan::{NetworkPlan, PlanMetadata, PlanRequest, SubnetConfig, SubnetType};
pub use subnet::{calculate_subnet, SubnetInfo};
