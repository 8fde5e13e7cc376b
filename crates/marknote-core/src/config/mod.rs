//! Client configuration.
//!
//! Values are layered: a JSON config file, then `MARKNOTE_*` environment
//! variables, then whatever the shell sets explicitly (CLI flags). Every layer
//! is optional; unset values fall back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::util::{non_blank, parse_base_url};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5080";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

pub const ENV_API_URL: &str = "MARKNOTE_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "MARKNOTE_TIMEOUT_SECS";
pub const ENV_DB_PATH: &str = "MARKNOTE_DB_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write config at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize config: {0}")]
    Serialize(serde_json::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Base URL of the note service, e.g. `https://notes.example.com`
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Per-request timeout; a timed-out call counts as unreachable
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// Local database file
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Load config from a JSON file; a missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str::<Self>(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.normalized()
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let serialized = serde_json::to_string_pretty(&self.clone().normalized()?)
            .map_err(ConfigError::Serialize)?;
        std::fs::write(path, serialized).map_err(write_error)
    }

    /// Overlay `MARKNOTE_*` values looked up by key, e.g. `std::env::var`
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = non_blank(lookup(ENV_API_URL)) {
            self.api_base_url = Some(url);
        }
        if let Some(raw) = non_blank(lookup(ENV_TIMEOUT_SECS)) {
            let secs = raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                field: ENV_TIMEOUT_SECS,
                reason: format!("'{raw}' is not a whole number of seconds"),
            })?;
            self.request_timeout_secs = Some(secs);
        }
        if let Some(path) = non_blank(lookup(ENV_DB_PATH)) {
            self.db_path = Some(PathBuf::from(path));
        }
        self.normalized()
    }

    /// Effective API base URL, without trailing slash
    pub fn api_base_url(&self) -> String {
        non_blank(self.api_base_url.clone()).map_or_else(
            || DEFAULT_API_BASE_URL.to_string(),
            |url| url.trim_end_matches('/').to_string(),
        )
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Trim values and reject ones that cannot work
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.api_base_url = non_blank(self.api_base_url)
            .map(|url| parse_base_url(&url))
            .transpose()
            .map_err(|error| ConfigError::InvalidValue {
                field: "api_base_url",
                reason: error.to_string(),
            })?;
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_secs",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(
            config.request_timeout(),
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = ClientConfig {
            api_base_url: Some("https://file.example.com".to_string()),
            request_timeout_secs: Some(5),
            db_path: None,
        }
        .with_overrides(lookup(&[
            (ENV_API_URL, " https://env.example.com/ "),
            (ENV_DB_PATH, "/tmp/notes.db"),
        ]))
        .unwrap();

        assert_eq!(config.api_base_url(), "https://env.example.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/notes.db")));
    }

    #[test]
    fn overrides_reject_bad_values() {
        assert!(ClientConfig::default()
            .with_overrides(lookup(&[(ENV_TIMEOUT_SECS, "soon")]))
            .is_err());
        assert!(ClientConfig::default()
            .with_overrides(lookup(&[(ENV_TIMEOUT_SECS, "0")]))
            .is_err());
        assert!(ClientConfig::default()
            .with_overrides(lookup(&[(ENV_API_URL, "notes.example.com")]))
            .is_err());
    }

    #[test]
    fn config_file_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("marknote").join("config.json");

        let config = ClientConfig {
            api_base_url: Some("https://notes.example.com".to_string()),
            request_timeout_secs: Some(30),
            db_path: Some(PathBuf::from("notes.db")),
        };
        config.save_to_path(&path).unwrap();

        assert_eq!(ClientConfig::load_from_path(&path).unwrap(), config);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded = ClientConfig::load_from_path(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(loaded, ClientConfig::default());
    }

    #[test]
    fn config_file_rejects_unknown_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{"api_base_url":"https://x.io","token":"nope"}"#).unwrap();

        let error = ClientConfig::load_from_path(&path).unwrap_err();
        assert!(error.to_string().contains("unknown field"));
    }
}
