//! Kubernetes network plan generation.
//!
//! - [`tiers`] - static deployment size table
//! - [`provider`] - provider aliases and availability zone labels
//! - [`generator`] - sequential block allocation
//! - [`validate`] - consistency check on assembled plans

mod generator;
mod provider;
mod tiers;
mod validate;

pub use generator::{
    generate_network_plan, generate_network_plan_with, prefix_for_span, random_private_vpc,
    resolve_vpc, tier_span, DEFAULT_VPC_PREFIX,
};
pub use provider::Provider;
pub use tiers::{get_tier, list_deployment_tiers, DeploymentTier, TierListing, DEPLOYMENT_TIERS};
pub use validate::validate_plan;
