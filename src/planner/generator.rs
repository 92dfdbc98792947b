//! Network plan generation.
//!
//! Blocks are carved from the VPC base at increasing offsets: public subnets,
//! then private subnets, then the pod block, then the service block. Each
//! block starts at the running offset rounded up to its own size, so every
//! block is prefix-aligned and none can overlap an earlier one.
//!
//! Pod and service blocks are not required to fall inside the VPC; for the
//! larger tiers they extend past a /16 the way secondary ranges do.

use super::provider::Provider;
use super::tiers::{get_tier, DeploymentTier};
use super::validate::validate_plan;
use crate::error::{CidrError, Result};
use crate::models::{
    is_rfc1918, Cidr, NetworkPlan, PlanMetadata, PlanRequest, SubnetConfig,
    SubnetInfo, SubnetType, MAX_LENGTH,
};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::net::Ipv4Addr;

/// Prefix of a randomly chosen VPC block.
pub const DEFAULT_VPC_PREFIX: u8 = 16;

const ADDRESS_SPACE: u64 = 1 << 32;

/// Generate a plan, picking a random private VPC when none is given.
pub fn generate_network_plan(request: &PlanRequest) -> Result<NetworkPlan> {
    generate_network_plan_with(request, &mut rand::rng(), Utc::now())
}

/// Generate a plan with an explicit random source and timestamp. Output
/// depends only on the arguments.
pub fn generate_network_plan_with<R: Rng>(
    request: &PlanRequest,
    rng: &mut R,
    generated_at: DateTime<Utc>,
) -> Result<NetworkPlan> {
    let vpc = match request.vpc_cidr.as_deref() {
        Some(vpc_cidr) => resolve_vpc(vpc_cidr)?,
        None => random_private_vpc(rng)?,
    };
    let tier = get_tier(&request.deployment_size)?;
    let provider = Provider::resolve(request.provider.as_deref());
    let region = request
        .region
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(provider.default_region())
        .to_string();

    check_vpc_size(&vpc, tier)?;
    log::debug!(
        "planning {} for {provider} in {region}, vpc {vpc}",
        tier.name
    );

    let mut allocator = BlockAllocator::new(vpc);
    let public_subnets = allocate_subnets(
        &mut allocator,
        SubnetType::Public,
        tier.public_subnets,
        tier.public_subnet_prefix,
        provider,
        &region,
    )?;
    let private_subnets = allocate_subnets(
        &mut allocator,
        SubnetType::Private,
        tier.private_subnets,
        tier.private_subnet_prefix,
        provider,
        &region,
    )?;
    let pod_cidr = allocator.carve(tier.pods_prefix)?;
    let service_cidr = allocator.carve(tier.services_prefix)?;

    let plan = NetworkPlan {
        deployment_size: tier.name.to_string(),
        provider: provider.name().to_string(),
        region: Some(region),
        deployment_name: request.deployment_name.clone(),
        vpc_cidr: vpc,
        public_subnets,
        private_subnets,
        pod_cidr,
        service_cidr,
        metadata: PlanMetadata {
            generated_at,
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    validate_plan(&plan, tier)?;
    Ok(plan)
}

/// Validate a caller supplied VPC and normalize it to its network address.
pub fn resolve_vpc(vpc_cidr: &str) -> Result<Cidr> {
    let vpc = SubnetInfo::from_cidr(Cidr::parse(vpc_cidr)?);
    if !is_rfc1918(vpc.network) || !is_rfc1918(vpc.broadcast) {
        return Err(CidrError::PublicAddressRejected(vpc_cidr.trim().to_string()));
    }
    Ok(vpc.cidr)
}

/// A /16 from one of the three RFC 1918 ranges, chosen uniformly.
pub fn random_private_vpc<R: Rng>(rng: &mut R) -> Result<Cidr> {
    let addr = match rng.random_range(0..3) {
        0 => Ipv4Addr::new(10, rng.random_range(0..=255), 0, 0),
        1 => Ipv4Addr::new(172, rng.random_range(16..=31), 0, 0),
        _ => Ipv4Addr::new(192, 168, 0, 0),
    };
    Cidr::new(addr, DEFAULT_VPC_PREFIX)
}

fn check_vpc_size(vpc: &Cidr, tier: &DeploymentTier) -> Result<()> {
    for subnet_prefix in [tier.public_subnet_prefix, tier.private_subnet_prefix] {
        if vpc.prefix() >= subnet_prefix {
            return Err(CidrError::VpcTooSmall {
                vpc: vpc.to_string(),
                subnet_prefix,
            });
        }
    }
    if vpc.prefix() > tier.min_vpc_prefix {
        log::warn!(
            "vpc {vpc} is smaller than /{} recommended for {}, blocks will extend past it",
            tier.min_vpc_prefix,
            tier.name
        );
    }
    Ok(())
}

fn allocate_subnets(
    allocator: &mut BlockAllocator,
    subnet_type: SubnetType,
    count: usize,
    prefix: u8,
    provider: Provider,
    region: &str,
) -> Result<Vec<SubnetConfig>> {
    (0..count)
        .map(|i| -> Result<SubnetConfig> {
            Ok(SubnetConfig {
                cidr: allocator.carve(prefix)?,
                name: format!("{}-{}", subnet_type.as_str(), i + 1),
                subnet_type,
                availability_zone: provider.zone_label(region, i),
            })
        })
        .collect()
}

/// Number of addresses a tier consumes from an ideally aligned base, pod and
/// service blocks included.
pub fn tier_span(tier: &DeploymentTier) -> Result<u64> {
    let mut allocator = BlockAllocator::new(Cidr::new(Ipv4Addr::UNSPECIFIED, 0)?);
    for _ in 0..tier.public_subnets {
        allocator.carve(tier.public_subnet_prefix)?;
    }
    for _ in 0..tier.private_subnets {
        allocator.carve(tier.private_subnet_prefix)?;
    }
    allocator.carve(tier.pods_prefix)?;
    allocator.carve(tier.services_prefix)?;
    Ok(allocator.consumed())
}

/// Sequential, aligned carving from a base address. Works in u64 so running
/// past 255.255.255.255 is detected instead of wrapping.
pub(crate) struct BlockAllocator {
    base: u64,
    next: u64,
}

impl BlockAllocator {
    pub(crate) fn new(vpc: Cidr) -> BlockAllocator {
        let base = u64::from(vpc.first());
        BlockAllocator { base, next: base }
    }

    /// Take the next block of the given prefix.
    pub(crate) fn carve(&mut self, prefix: u8) -> Result<Cidr> {
        let size = Cidr::new(Ipv4Addr::UNSPECIFIED, prefix)?.size();
        let start = self.next.div_ceil(size) * size;
        let end = start + size;
        if end > ADDRESS_SPACE {
            return Err(CidrError::AddressSpaceExhausted(format!(
                "a /{prefix} after {} does not fit below 255.255.255.255",
                Ipv4Addr::from((self.next - 1) as u32)
            )));
        }
        self.next = end;

        let addr = Ipv4Addr::from(start as u32);
        let block = SubnetInfo::from_cidr(Cidr::new(addr, prefix)?);
        log::trace!(
            "carved {} at offset {} ({} addresses)",
            block.cidr,
            start - self.base,
            block.total_hosts
        );
        Ok(block.cidr)
    }

    /// Addresses used so far, alignment gaps included.
    pub(crate) fn consumed(&self) -> u64 {
        self.next - self.base
    }
}

/// Smallest prefix whose block holds `span` addresses.
pub fn prefix_for_span(span: u64) -> u8 {
    if span <= 1 {
        return MAX_LENGTH;
    }
    let bits = 64 - (span - 1).leading_zeros() as u8;
    MAX_LENGTH.saturating_sub(bits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::tiers::DEPLOYMENT_TIERS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn plan(request: &PlanRequest) -> Result<NetworkPlan> {
        generate_network_plan_with(request, &mut seeded(), Utc::now())
    }

    #[test]
    fn test_standard_plan() {
        let p = plan(&PlanRequest::new("standard").vpc_cidr("10.0.0.0/16")).unwrap();
        assert_eq!(p.vpc_cidr.to_string(), "10.0.0.0/16");
        assert_eq!(p.deployment_size, "standard");
        assert_eq!(p.provider, "kubernetes");
        assert_eq!(p.region.as_deref(), Some("region"));
        assert_eq!(p.public_subnets.len(), 1);
        assert_eq!(p.private_subnets.len(), 1);
        assert_eq!(p.public_subnets[0].cidr.to_string(), "10.0.0.0/25");
        assert_eq!(p.public_subnets[0].name, "public-1");
        assert_eq!(p.private_subnets[0].cidr.to_string(), "10.0.2.0/23");
        assert_eq!(p.private_subnets[0].name, "private-1");
        assert_eq!(p.pod_cidr.to_string(), "10.0.32.0/19");
        assert_eq!(p.service_cidr.to_string(), "10.0.64.0/21");
    }

    #[test]
    fn test_vpc_normalized() {
        let p = plan(&PlanRequest::new("micro").vpc_cidr("172.20.9.9/16")).unwrap();
        assert_eq!(p.vpc_cidr.to_string(), "172.20.0.0/16");
        assert_eq!(p.public_subnets[0].cidr.to_string(), "172.20.0.0/26");
        assert_eq!(p.private_subnets[0].cidr.to_string(), "172.20.0.128/25");
    }

    #[test]
    fn test_zone_labels_follow_provider() {
        let p = plan(
            &PlanRequest::new("enterprise")
                .vpc_cidr("10.0.0.0/14")
                .provider("aws")
                .region("eu-west-1"),
        )
        .unwrap();
        assert_eq!(p.provider, "eks");
        let zones: Vec<&str> = p
            .public_subnets
            .iter()
            .map(|s| s.availability_zone.as_str())
            .collect();
        assert_eq!(zones, vec!["eu-west-1a", "eu-west-1b", "eu-west-1c"]);
        assert_eq!(p.private_subnets[2].availability_zone, "eu-west-1c");

        let p = plan(&PlanRequest::new("professional").provider("azure")).unwrap();
        assert_eq!(p.region.as_deref(), Some("eastus"));
        assert_eq!(p.private_subnets[1].availability_zone, "eastus-2");
    }

    #[test]
    fn test_public_vpc_rejected() {
        for vpc in ["8.8.8.0/16", "11.0.0.0/16", "172.32.0.0/16", "192.169.0.0/16", "10.0.0.0/7"] {
            assert!(
                matches!(
                    plan(&PlanRequest::new("standard").vpc_cidr(vpc)),
                    Err(CidrError::PublicAddressRejected(_))
                ),
                "{vpc}"
            );
        }
    }

    #[test]
    fn test_vpc_too_small() {
        assert_eq!(
            plan(&PlanRequest::new("standard").vpc_cidr("10.0.0.0/25")).unwrap_err(),
            CidrError::VpcTooSmall {
                vpc: "10.0.0.0/25".to_string(),
                subnet_prefix: 25
            }
        );
        // public fits, private does not
        assert!(matches!(
            plan(&PlanRequest::new("standard").vpc_cidr("10.0.0.0/24")),
            Err(CidrError::VpcTooSmall {
                subnet_prefix: 23,
                ..
            })
        ));
    }

    #[test]
    fn test_unknown_tier() {
        assert_eq!(
            plan(&PlanRequest::new("galactic").vpc_cidr("10.0.0.0/16")).unwrap_err(),
            CidrError::UnknownDeploymentSize("galactic".to_string())
        );
    }

    #[test]
    fn test_bad_vpc_format() {
        assert!(matches!(
            plan(&PlanRequest::new("micro").vpc_cidr("10.0.0.0")),
            Err(CidrError::InvalidCidrFormat(_))
        ));
        assert!(matches!(
            plan(&PlanRequest::new("micro").vpc_cidr("10.0.0.0/64")),
            Err(CidrError::InvalidPrefix(_))
        ));
    }

    #[test]
    fn test_random_vpc_is_private_16() {
        let mut rng = seeded();
        for _ in 0..200 {
            let vpc = random_private_vpc(&mut rng).unwrap();
            assert_eq!(vpc.prefix(), DEFAULT_VPC_PREFIX);
            assert!(is_rfc1918(vpc.network()));
            assert!(is_rfc1918(vpc.broadcast()));
            assert_eq!(vpc, vpc.canonical());
        }
    }

    #[test]
    fn test_same_seed_same_plan() {
        let request = PlanRequest::new("professional").provider("gke");
        let now = Utc::now();
        let a = generate_network_plan_with(&request, &mut seeded(), now).unwrap();
        let b = generate_network_plan_with(&request, &mut seeded(), now).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_min_vpc_prefix_matches_span() {
        for tier in DEPLOYMENT_TIERS.iter() {
            let span = tier_span(tier).unwrap();
            assert_eq!(prefix_for_span(span), tier.min_vpc_prefix, "{}", tier.name);
        }
    }

    #[test]
    fn test_tier_fits_min_vpc() {
        for tier in DEPLOYMENT_TIERS.iter() {
            let vpc = format!("10.0.0.0/{}", tier.min_vpc_prefix);
            let p = plan(&PlanRequest::new(tier.name).vpc_cidr(&vpc)).unwrap();
            for block in p.allocated_blocks() {
                assert!(
                    p.vpc_cidr.contains(block.network()) && p.vpc_cidr.contains(block.broadcast()),
                    "{} {block} outside {vpc}",
                    tier.name
                );
            }
        }
    }

    #[test]
    fn test_allocator_alignment() {
        let mut allocator = BlockAllocator::new(Cidr::parse("10.0.0.0/16").unwrap());
        assert_eq!(allocator.carve(26).unwrap().to_string(), "10.0.0.0/26");
        assert_eq!(allocator.carve(24).unwrap().to_string(), "10.0.1.0/24");
        assert_eq!(allocator.carve(26).unwrap().to_string(), "10.0.2.0/26");
        assert_eq!(allocator.consumed(), 2 * 256 + 64);
    }

    #[test]
    fn test_allocator_exhausted() {
        let mut allocator = BlockAllocator::new(Cidr::parse("255.255.0.0/16").unwrap());
        assert_eq!(allocator.carve(17).unwrap().to_string(), "255.255.0.0/17");
        assert_eq!(allocator.carve(17).unwrap().to_string(), "255.255.128.0/17");
        assert!(matches!(
            allocator.carve(32),
            Err(CidrError::AddressSpaceExhausted(_))
        ));
    }

    #[test]
    fn test_prefix_for_span() {
        assert_eq!(prefix_for_span(1), 32);
        assert_eq!(prefix_for_span(256), 24);
        assert_eq!(prefix_for_span(257), 23);
        assert_eq!(prefix_for_span(1 << 32), 0);
    }
}
