//! Configuration types for the Reroute proxy.

mod listen;
mod rewrite;
mod upstream;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use listen::ListenConfig;
pub use rewrite::{ConfigError, RewriteConfig};
pub use upstream::UpstreamConfig;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub listen: ListenConfig,

    /// Primary upstream the inner handler forwards every request to.
    pub upstream: UpstreamConfig,

    /// Rewrite interception rule applied to the inner handler's responses.
    pub rewrite: RewriteConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.upstream.validate().map_err(|e| anyhow::anyhow!(e))?;
        self.rewrite.validate()?;
        Ok(())
    }
}
