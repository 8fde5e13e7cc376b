//! marknote CLI - offline-first notes from the terminal
//!
//! Every command works against the local database; `sync` reconciles it with
//! the note service using the session stored by `auth login`.

mod cli;
mod commands;
mod error;
mod settings;

#[cfg(test)]
mod tests;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::add::run_add;
use crate::commands::auth_cmd::run_auth;
use crate::commands::config::run_config;
use crate::commands::delete::run_delete;
use crate::commands::edit::run_edit;
use crate::commands::list::run_list;
use crate::commands::show::run_show;
use crate::commands::sync::run_sync;
use crate::error::CliError;
use crate::settings::{Overrides, Settings};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marknote=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::resolve(Overrides {
        db_path: cli.db_path,
        api_url: cli.api_url,
    })?;
    tracing::debug!("Using database at {}", settings.db_path.display());

    match cli.command {
        Commands::Add { title, body } => run_add(&title, body, &settings.db_path)?,
        Commands::List { limit, all, json } => run_list(limit, all, json, &settings.db_path)?,
        Commands::Show { id, json } => run_show(&id, json, &settings.db_path)?,
        Commands::Edit { id, title, body } => {
            run_edit(&id, title.as_deref(), body.as_deref(), &settings.db_path)?;
        }
        Commands::Delete { id } => run_delete(&id, &settings.db_path)?,
        Commands::Sync { json } => run_sync(json, &settings).await?,
        Commands::Auth { command } => run_auth(command, &settings).await?,
        Commands::Config { command } => run_config(command, &settings)?,
    }

    Ok(())
}
