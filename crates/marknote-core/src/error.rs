//! Error types for marknote-core
//!
//! `Error` is the local storage error. It is fatal to whatever operation
//! raised it, including a running sync; remote failures have their own
//! taxonomy in [`crate::remote::RemoteError`].

use thiserror::Error;

/// Result type alias using marknote-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in marknote-core storage operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Note not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
