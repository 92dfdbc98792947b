//! IPv4 subnet arithmetic and Kubernetes network plan generation.
//!
//! - [`models`] - CIDR parsing, mask math and the derived [`models::SubnetInfo`]
//! - [`processing`] - splitting and the bounded subnet tree
//! - [`planner`] - deployment tiers, provider labels and plan allocation
//! - [`output`] - CSV and terminal rendering

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod planner;
pub mod processing;

pub use error::{CidrError, Result};
pub use models::{calculate_subnet, Cidr, NetworkPlan, PlanRequest, SubnetInfo};
pub use planner::{generate_network_plan, list_deployment_tiers};
pub use processing::{split_subnet, SubnetTree};
