//! Text helpers for values typed by users: config files, env vars and flags.

use thiserror::Error;

/// Why a service base URL was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BaseUrlError {
    #[error("must not be empty")]
    Empty,
    #[error("must include http:// or https://")]
    MissingScheme,
}

/// Trimmed text, or `None` when nothing is left
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Canonical form of a service base URL: trimmed, http(s) only, no trailing `/`
pub fn parse_base_url(raw: &str) -> Result<String, BaseUrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BaseUrlError::Empty);
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(BaseUrlError::MissingScheme);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}
