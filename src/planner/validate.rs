//! Consistency check run on every assembled plan before it is returned.

use super::tiers::DeploymentTier;
use crate::error::{CidrError, Result};
use crate::models::{calculate_subnet, is_rfc1918, Cidr, NetworkPlan, SubnetConfig, SubnetType};
use crate::processing::find_overlaps;

/// Check a plan against the tier it was built from.
///
/// Every block must re-parse to itself in canonical form, counts, names and
/// prefixes must match the tier, and no two blocks may overlap.
pub fn validate_plan(plan: &NetworkPlan, tier: &DeploymentTier) -> Result<()> {
    let fail = |msg: String| -> Result<()> { Err(CidrError::PlanAssemblyInvariantViolation(msg)) };

    if plan.deployment_size != tier.name {
        return fail(format!(
            "deployment size '{}' does not match tier '{}'",
            plan.deployment_size, tier.name
        ));
    }
    if plan.provider.is_empty() {
        return fail("provider is empty".to_string());
    }

    check_block("vpc", &plan.vpc_cidr, None)?;
    if !is_rfc1918(plan.vpc_cidr.network()) {
        return fail(format!("vpc {} is not private", plan.vpc_cidr));
    }

    check_subnets(
        &plan.public_subnets,
        SubnetType::Public,
        tier.public_subnets,
        tier.public_subnet_prefix,
    )?;
    check_subnets(
        &plan.private_subnets,
        SubnetType::Private,
        tier.private_subnets,
        tier.private_subnet_prefix,
    )?;
    check_block("pod cidr", &plan.pod_cidr, Some(tier.pods_prefix))?;
    check_block("service cidr", &plan.service_cidr, Some(tier.services_prefix))?;

    let blocks = plan.allocated_blocks();
    if let Some(conflict) = find_overlaps(&blocks).first() {
        return fail(format!("{} overlaps {}", conflict.first, conflict.second));
    }
    Ok(())
}

fn check_subnets(
    subnets: &[SubnetConfig],
    subnet_type: SubnetType,
    count: usize,
    prefix: u8,
) -> Result<()> {
    if subnets.len() != count {
        return Err(CidrError::PlanAssemblyInvariantViolation(format!(
            "expected {count} {} subnets, found {}",
            subnet_type.as_str(),
            subnets.len()
        )));
    }
    for (i, subnet) in subnets.iter().enumerate() {
        let expected_name = format!("{}-{}", subnet_type.as_str(), i + 1);
        if subnet.name != expected_name || subnet.subnet_type != subnet_type {
            return Err(CidrError::PlanAssemblyInvariantViolation(format!(
                "subnet {i} is '{}' ({}), expected '{expected_name}'",
                subnet.name,
                subnet.subnet_type.as_str()
            )));
        }
        if subnet.availability_zone.is_empty() {
            return Err(CidrError::PlanAssemblyInvariantViolation(format!(
                "{} has no availability zone",
                subnet.name
            )));
        }
        check_block(&subnet.name, &subnet.cidr, Some(prefix))?;
    }
    Ok(())
}

fn check_block(label: &str, cidr: &Cidr, prefix: Option<u8>) -> Result<()> {
    let info = calculate_subnet(&cidr.to_string())
        .map_err(|e| CidrError::PlanAssemblyInvariantViolation(format!("{label}: {e}")))?;
    if info.cidr != *cidr {
        return Err(CidrError::PlanAssemblyInvariantViolation(format!(
            "{label} {cidr} is not a network address, expected {}",
            info.cidr
        )));
    }
    if let Some(prefix) = prefix.filter(|p| *p != cidr.prefix()) {
        return Err(CidrError::PlanAssemblyInvariantViolation(format!(
            "{label} {cidr} should be a /{prefix}"
        )));
    }
    Ok(())
}
