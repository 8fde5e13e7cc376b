use marknote_core::auth::AuthClient;
use marknote_core::db::{SessionRepository, SqliteSessionRepository};

use crate::cli::AuthCommands;
use crate::commands::common::{format_timestamp, open_store};
use crate::error::CliError;
use crate::settings::Settings;

pub async fn run_auth(command: AuthCommands, settings: &Settings) -> Result<(), CliError> {
    match command {
        AuthCommands::Register { username, password } => {
            let client = AuthClient::new(&settings.api_base_url, settings.request_timeout)?;
            client.register(&username, &password).await?;
            println!(
                "Registered '{}'. Run `marknote auth login` to sign in.",
                username.trim()
            );
            Ok(())
        }
        AuthCommands::Login { username, password } => {
            let client = AuthClient::new(&settings.api_base_url, settings.request_timeout)?;
            let session = client.login(&username, &password).await?;

            let store = open_store(&settings.db_path)?;
            SqliteSessionRepository::new(store.database()).save(&session)?;
            tracing::info!("Stored session for '{}'", session.username);
            println!(
                "Signed in as {} at {}",
                session.username, settings.api_base_url
            );
            Ok(())
        }
        AuthCommands::Status => {
            let store = open_store(&settings.db_path)?;
            let session = SqliteSessionRepository::new(store.database()).load()?;
            let pending = store.count_pending()?;

            match session {
                Some(session) => println!(
                    "Signed in as {} since {} ({})",
                    session.username,
                    format_timestamp(session.issued_at),
                    settings.api_base_url
                ),
                None => println!("Not signed in ({})", settings.api_base_url),
            }
            println!("{pending} local change(s) waiting to sync");
            Ok(())
        }
        AuthCommands::Logout { wipe_local } => {
            let store = open_store(&settings.db_path)?;
            SqliteSessionRepository::new(store.database()).clear()?;

            if wipe_local {
                let removed = store.clear()?;
                println!("Signed out and removed {removed} local note(s)");
            } else {
                let pending = store.count_pending()?;
                println!("Signed out");
                if pending > 0 {
                    println!("{pending} local change(s) will sync after the next login");
                }
            }
            Ok(())
        }
    }
}
