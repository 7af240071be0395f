//! Rewrite interception rule configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Construction-time configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("target_service is required")]
    MissingTargetService,
    #[error("replace_rule is required when match_pattern is set")]
    MissingReplaceRule,
}

/// One rewrite rule: when the inner handler answers with `response_code`,
/// rewrite the request path through `match_pattern`/`replace_rule` and
/// re-proxy the request to `target_service`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RewriteConfig {
    /// Base URL (scheme + host) of the alternate upstream.
    pub target_service: String,

    /// Regex applied to the request path. Empty disables interception.
    #[serde(default)]
    pub match_pattern: String,

    /// Substitution template for the regex; `$1`, `$2`, ... reference
    /// capture groups.
    #[serde(default)]
    pub replace_rule: String,

    /// Status code that triggers the rewrite branch. The default of 0 can
    /// never equal a real HTTP status, so the branch never fires.
    #[serde(default)]
    pub response_code: u16,
}

impl RewriteConfig {
    /// Validate the rule.
    ///
    /// `response_code` is intentionally not validated and `match_pattern` is
    /// not compiled here; pattern compilation happens at request time and a
    /// bad pattern degrades to the replay fallback.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_service.is_empty() {
            return Err(ConfigError::MissingTargetService);
        }
        if !self.match_pattern.is_empty() && self.replace_rule.is_empty() {
            return Err(ConfigError::MissingReplaceRule);
        }
        Ok(())
    }
}
