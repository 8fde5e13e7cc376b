use std::io;

use marknote_core::auth::AuthError;
use marknote_core::config::ConfigError;
use marknote_core::remote::RemoteConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] marknote_core::Error),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Remote client setup failed: {0}")]
    RemoteConfig(#[from] RemoteConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Note title cannot be empty")]
    EmptyTitle,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Nothing to change; pass --title and/or --body")]
    NothingToEdit,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error("Failed to resolve the {0} directory")]
    MissingDirectory(&'static str),
    #[error("Not signed in. Run `marknote auth login` first.")]
    NotSignedIn,
    #[error("Session expired. Run `marknote auth login` to sign in again.")]
    SessionExpired,
}
