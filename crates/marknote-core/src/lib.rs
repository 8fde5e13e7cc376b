//! marknote-core - Core library for marknote
//!
//! This crate contains the shared models, the local note store, the remote
//! transport abstraction and the reconciliation engine that keeps the two in
//! step. The CLI (and any other shell) only talks to the types re-exported here.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod session;
pub mod state;
pub mod sync;
pub mod util;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::{LocalId, LocalRecord, RemoteId, RemoteRecord, Visibility};
pub use session::SessionContext;
pub use state::SyncState;
pub use sync::{ReconciliationEngine, SyncReport};
