//! Local persistence for marknote

mod connection;
mod migrations;
mod repository;
mod session_repository;

pub use connection::Database;
pub use repository::{LocalStore, SqliteLocalStore};
pub use session_repository::{SessionRepository, SqliteSessionRepository};
