//! Pure path rewriting.

use regex::Regex;
use thiserror::Error;

/// Per-request rewrite failures. All of them degrade to the replay fallback.
#[derive(Debug, Error)]
pub enum RewriteError {
    #[error("invalid match pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Apply `pattern`/`replacement` to `path`.
///
/// The pattern is compiled here, per request, so a pattern that does not
/// compile fails only the request it was evaluated for. Capture groups are
/// referenced as `$1`, `$2`, ... in the replacement. A path the pattern does
/// not match is returned unchanged.
pub fn rewrite_path(pattern: &str, replacement: &str, path: &str) -> Result<String, RewriteError> {
    let regex = Regex::new(pattern)?;
    Ok(regex.replace_all(path, replacement).into_owned())
}

/// Derive the `Host` header value from a target service URL by stripping any
/// `http://`/`https://` prefix.
pub fn target_host(target_service: &str) -> &str {
    target_service
        .strip_prefix("https://")
        .or_else(|| target_service.strip_prefix("http://"))
        .unwrap_or(target_service)
}
