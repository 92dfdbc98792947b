//! Runtime settings for the command line tool, read from the environment
//! (and a `.env` file, loaded by `main`).

pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";
pub const DEFAULT_PROVIDER: &str = "kubernetes";

pub const ENV_LOG_CONFIG: &str = "CIDR_PLANNER_LOG_CONFIG";
pub const ENV_PROVIDER: &str = "CIDR_PLANNER_PROVIDER";
pub const ENV_REGION: &str = "CIDR_PLANNER_REGION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// log4rs YAML file.
    pub log_config: String,
    /// Provider used when a plan request names none.
    pub provider: String,
    /// Region used when a plan request names none.
    pub region: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            log_config: DEFAULT_LOG_CONFIG.to_string(),
            provider: DEFAULT_PROVIDER.to_string(),
            region: None,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> PlannerConfig {
        PlannerConfig::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> PlannerConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = PlannerConfig::default();
        PlannerConfig {
            log_config: get(ENV_LOG_CONFIG).unwrap_or(defaults.log_config),
            provider: get(ENV_PROVIDER).unwrap_or(defaults.provider),
            region: get(ENV_REGION),
        }
    }
}
