//! Deployment tier table.

use crate::error::{CidrError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// Subnet counts and sizes for one deployment size.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTier {
    pub name: &'static str,
    pub description: &'static str,
    pub public_subnets: usize,
    pub private_subnets: usize,
    pub public_subnet_prefix: u8,
    pub private_subnet_prefix: u8,
    pub pods_prefix: u8,
    pub services_prefix: u8,
    /// Smallest VPC that holds every block of the plan, pods and services
    /// included.
    pub min_vpc_prefix: u8,
}

pub static DEPLOYMENT_TIERS: [DeploymentTier; 5] = [
    DeploymentTier {
        name: "micro",
        description: "Single node, development and proof of concept",
        public_subnets: 1,
        private_subnets: 1,
        public_subnet_prefix: 26,
        private_subnet_prefix: 25,
        pods_prefix: 20,
        services_prefix: 22,
        min_vpc_prefix: 18,
    },
    DeploymentTier {
        name: "standard",
        description: "Small production cluster in one zone",
        public_subnets: 1,
        private_subnets: 1,
        public_subnet_prefix: 25,
        private_subnet_prefix: 23,
        pods_prefix: 19,
        services_prefix: 21,
        min_vpc_prefix: 17,
    },
    DeploymentTier {
        name: "professional",
        description: "Production cluster across two zones",
        public_subnets: 2,
        private_subnets: 2,
        public_subnet_prefix: 25,
        private_subnet_prefix: 22,
        pods_prefix: 18,
        services_prefix: 20,
        min_vpc_prefix: 16,
    },
    DeploymentTier {
        name: "enterprise",
        description: "Large production cluster across three zones",
        public_subnets: 3,
        private_subnets: 3,
        public_subnet_prefix: 24,
        private_subnet_prefix: 21,
        pods_prefix: 16,
        services_prefix: 19,
        min_vpc_prefix: 14,
    },
    DeploymentTier {
        name: "hyperscale",
        description: "Very large multi-zone cluster",
        public_subnets: 3,
        private_subnets: 3,
        public_subnet_prefix: 23,
        private_subnet_prefix: 20,
        pods_prefix: 14,
        services_prefix: 18,
        min_vpc_prefix: 12,
    },
];

/// Look up a tier by name, ignoring case and surrounding whitespace.
pub fn get_tier(name: &str) -> Result<&'static DeploymentTier> {
    let wanted = name.trim();
    DEPLOYMENT_TIERS
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| CidrError::UnknownDeploymentSize(name.to_string()))
}

/// Either a single tier or the whole table keyed by name.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum TierListing {
    Single(DeploymentTier),
    All(BTreeMap<&'static str, DeploymentTier>),
}

/// List one tier (when `name` is given) or all of them.
pub fn list_deployment_tiers(name: Option<&str>) -> Result<TierListing> {
    match name {
        Some(name) => get_tier(name).map(|t| TierListing::Single(*t)),
        None => Ok(TierListing::All(
            DEPLOYMENT_TIERS.iter().map(|t| (t.name, *t)).collect(),
        )),
    }
}
