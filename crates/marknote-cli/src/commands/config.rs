use std::path::PathBuf;

use marknote_core::ClientConfig;

use crate::cli::ConfigCommands;
use crate::error::CliError;
use crate::settings::Settings;

pub fn run_config(command: ConfigCommands, settings: &Settings) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => {
            println!("{}", serde_json::to_string_pretty(settings)?);
            Ok(())
        }
        ConfigCommands::Set {
            api_base_url,
            timeout_secs,
            database,
        } => {
            let config = run_config_set(settings, api_base_url, timeout_secs, database)?;
            println!("Updated {}", settings.config_path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Merge explicit values into the config file, leaving the rest as stored
pub fn run_config_set(
    settings: &Settings,
    api_base_url: Option<String>,
    timeout_secs: Option<u64>,
    database: Option<PathBuf>,
) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::load_from_path(&settings.config_path)?;
    if let Some(url) = api_base_url {
        config.api_base_url = Some(url);
    }
    if let Some(secs) = timeout_secs {
        config.request_timeout_secs = Some(secs);
    }
    if let Some(path) = database {
        config.db_path = Some(path);
    }

    let config = config.normalized()?;
    config.save_to_path(&settings.config_path)?;
    tracing::info!("Saved config to {}", settings.config_path.display());
    Ok(config)
}
