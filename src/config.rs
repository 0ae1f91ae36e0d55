use serde::{Deserialize, Serialize};

use std::fmt;

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    pub advancer: AdvancerConfig,
}

/// Settings for the process advancer.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct AdvancerConfig {
    /// Maximum number of state transitions a single execute call may
    /// auto-advance through without client input.
    pub max_auto_advance: usize,
    /// Number of committed transitions the table state machine keeps.
    pub transition_log_size: usize,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            // Override with environment variables using `DOMAIN_API__` prefix and `__` separator
            // e.g., DOMAIN_API__ADVANCER__MAX_AUTO_ADVANCE=32
            .add_source(
                config::Environment::with_prefix("DOMAIN_API")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for AdvancerConfig {
    fn default() -> Self {
        Self {
            max_auto_advance: 64,
            transition_log_size: 100,
        }
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "Error serializing config"),
        }
    }
}
