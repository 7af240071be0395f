//! Primary upstream configuration.

use serde::{Deserialize, Serialize};

/// The upstream the inner handler forwards to before any interception.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Base URL (scheme + host + optional port), e.g. `http://127.0.0.1:9000`.
    pub url: String,
}

impl UpstreamConfig {
    /// Validate that the upstream URL carries a supported scheme.
    pub fn validate(&self) -> Result<(), String> {
        let scheme = self
            .url
            .split_once("://")
            .map(|(scheme, _)| scheme)
            .ok_or_else(|| format!("Invalid upstream URL (missing scheme): {}", self.url))?;
        match scheme {
            "http" | "https" => Ok(()),
            other => Err(format!(
                "Unsupported upstream scheme '{other}'. Currently supported: http, https"
            )),
        }
    }
}
