//! Error type shared by the address arithmetic and the plan generator.

use thiserror::Error;

/// Every failure the library can report. All are local validation failures;
/// none are transient.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CidrError {
    #[error("invalid IPv4 address: '{0}'")]
    InvalidAddress(String),

    #[error("invalid prefix length: '{0}' (must be 0-32)")]
    InvalidPrefix(String),

    #[error("invalid CIDR format: '{0}' (expected address/prefix)")]
    InvalidCidrFormat(String),

    #[error("cannot split {0}: a /32 has no smaller subnets")]
    CannotSplit(String),

    #[error("subnet tree has {size} nodes, limit is {limit}")]
    TreeSizeLimitExceeded { size: usize, limit: usize },

    #[error("VPC CIDR {0} is not an RFC 1918 private range")]
    PublicAddressRejected(String),

    #[error("unknown deployment size '{0}'")]
    UnknownDeploymentSize(String),

    #[error("VPC {vpc} is too small for /{subnet_prefix} subnets")]
    VpcTooSmall { vpc: String, subnet_prefix: u8 },

    #[error("address space exhausted: {0}")]
    AddressSpaceExhausted(String),

    #[error("assembled plan failed validation: {0}")]
    PlanAssemblyInvariantViolation(String),
}

impl CidrError {
    /// HTTP status an API layer should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            CidrError::AddressSpaceExhausted(_) | CidrError::PlanAssemblyInvariantViolation(_) => {
                500
            }
            _ => 400,
        }
    }

    /// True when the caller supplied bad input, false for internal failures.
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }

    /// Process exit code for the command line tool: 2 for rejected input,
    /// 1 for internal failures.
    pub fn exit_code(&self) -> i32 {
        if self.is_client_error() {
            2
        } else {
            1
        }
    }
}

pub type Result<T> = std::result::Result<T, CidrError>;
