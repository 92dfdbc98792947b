//! Network plan request and output records.

use super::Cidr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;

/// Input to plan generation. Everything but the tier name is optional.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub deployment_size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
}

impl PlanRequest {
    pub fn new(deployment_size: &str) -> PlanRequest {
        PlanRequest {
            deployment_size: deployment_size.to_string(),
            ..Default::default()
        }
    }

    pub fn provider(mut self, provider: &str) -> PlanRequest {
        self.provider = Some(provider.to_string());
        self
    }

    pub fn vpc_cidr(mut self, vpc_cidr: &str) -> PlanRequest {
        self.vpc_cidr = Some(vpc_cidr.to_string());
        self
    }

    pub fn region(mut self, region: &str) -> PlanRequest {
        self.region = Some(region.to_string());
        self
    }

    pub fn deployment_name(mut self, name: &str) -> PlanRequest {
        self.deployment_name = Some(name.to_string());
        self
    }

    /// Parse a JSON request body. Errors name the offending field path.
    pub fn from_json(json: &str) -> Result<PlanRequest, Box<dyn Error>> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        let request: PlanRequest = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(|e| format!("Error parsing plan request: path={} error={}", e.path(), e))?;
        Ok(request)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubnetType {
    Public,
    Private,
}

impl SubnetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetType::Public => "public",
            SubnetType::Private => "private",
        }
    }
}

/// One node subnet of a plan.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetConfig {
    pub cidr: Cidr,
    /// `public-1`, `private-2`, ...
    pub name: String,
    #[serde(rename = "type")]
    pub subnet_type: SubnetType,
    pub availability_zone: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetadata {
    pub generated_at: DateTime<Utc>,
    pub version: String,
}

/// Complete address allocation for one cluster.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPlan {
    pub deployment_size: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_name: Option<String>,
    pub vpc_cidr: Cidr,
    pub public_subnets: Vec<SubnetConfig>,
    pub private_subnets: Vec<SubnetConfig>,
    pub pod_cidr: Cidr,
    pub service_cidr: Cidr,
    pub metadata: PlanMetadata,
}

impl NetworkPlan {
    /// Every allocated block in allocation order: public, private, pods, services.
    pub fn allocated_blocks(&self) -> Vec<Cidr> {
        self.public_subnets
            .iter()
            .chain(self.private_subnets.iter())
            .map(|s| s.cidr)
            .chain([self.pod_cidr, self.service_cidr])
            .collect()
    }
}
