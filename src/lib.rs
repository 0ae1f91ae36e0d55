pub mod config;
pub mod error;
pub mod models;
pub mod process;

pub use config::{AdvancerConfig, Config};
pub use error::{Error, Result};

/// Load configuration from environment variables
pub fn load_config() -> Result<Config> {
    Ok(Config::load()?)
}
