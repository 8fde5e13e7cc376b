//! Effective CLI settings: config file, then environment, then flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use marknote_core::ClientConfig;
use serde::Serialize;

use crate::error::CliError;

const APP_DIR: &str = "marknote";
const CONFIG_FILE_NAME: &str = "config.json";
const DB_FILE_NAME: &str = "marknote.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub config_path: PathBuf,
    pub db_path: PathBuf,
    pub api_base_url: String,
    #[serde(rename = "request_timeout_secs", serialize_with = "serialize_secs")]
    pub request_timeout: Duration,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub db_path: Option<PathBuf>,
    pub api_url: Option<String>,
}

impl Settings {
    pub fn resolve(overrides: Overrides) -> Result<Self, CliError> {
        let config_path = default_config_path()?;
        let default_db = default_db_path()?;
        Self::resolve_with(&config_path, default_db, overrides, |key| {
            std::env::var(key).ok()
        })
    }

    pub fn resolve_with(
        config_path: &Path,
        default_db_path: PathBuf,
        overrides: Overrides,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CliError> {
        let mut config = ClientConfig::load_from_path(config_path)?.with_overrides(lookup)?;
        if let Some(url) = overrides.api_url {
            config.api_base_url = Some(url);
        }
        if let Some(path) = overrides.db_path {
            config.db_path = Some(path);
        }
        let config = config.normalized()?;

        Ok(Self {
            config_path: config_path.to_path_buf(),
            api_base_url: config.api_base_url(),
            request_timeout: config.request_timeout(),
            db_path: config.db_path.unwrap_or(default_db_path),
        })
    }
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    Ok(dirs::config_dir()
        .ok_or(CliError::MissingDirectory("config"))?
        .join(APP_DIR)
        .join(CONFIG_FILE_NAME))
}

pub fn default_db_path() -> Result<PathBuf, CliError> {
    Ok(dirs::data_dir()
        .ok_or(CliError::MissingDirectory("data"))?
        .join(APP_DIR)
        .join(DB_FILE_NAME))
}
