//! Transport abstraction over the authoritative note service.
//!
//! Each call is one network round trip. Nothing here retries; the
//! reconciliation engine decides what a failure means for the record involved.

mod http;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{RemoteId, RemoteRecord};
use crate::session::SessionContext;

pub use http::{HttpRemoteClient, DEFAULT_REQUEST_TIMEOUT};
pub(crate) use http::{map_status, map_transport_error, normalize_base_url};

/// Failure of a single remote call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Credential invalid or expired
    #[error("Remote rejected the session credential")]
    Unauthorized,
    /// Target id absent remotely
    #[error("Note not found on remote")]
    NotFound,
    /// Transport failure or timeout
    #[error("Remote unreachable: {0}")]
    Unreachable(String),
    /// Any other refusal by the server
    #[error("Remote rejected request: {0}")]
    ServerRejected(String),
}

impl RemoteError {
    /// Fieldless discriminant, used in sync reports
    #[must_use]
    pub const fn kind(&self) -> RemoteErrorKind {
        match self {
            Self::Unauthorized => RemoteErrorKind::Unauthorized,
            Self::NotFound => RemoteErrorKind::NotFound,
            Self::Unreachable(_) => RemoteErrorKind::Unreachable,
            Self::ServerRejected(_) => RemoteErrorKind::ServerRejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteErrorKind {
    Unauthorized,
    NotFound,
    Unreachable,
    ServerRejected,
}

/// Errors raised while building a remote client
#[derive(Debug, Error)]
pub enum RemoteConfigError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// CRUD surface of the remote note service
#[allow(async_fn_in_trait)]
pub trait RemoteClient {
    /// Create a note; the remote store assigns its identity
    async fn create(
        &self,
        session: &SessionContext,
        title: &str,
        body: &str,
    ) -> Result<RemoteRecord, RemoteError>;

    /// Replace title and body of an existing note
    async fn update(
        &self,
        session: &SessionContext,
        id: RemoteId,
        title: &str,
        body: &str,
    ) -> Result<(), RemoteError>;

    /// Delete a note
    async fn delete(&self, session: &SessionContext, id: RemoteId) -> Result<(), RemoteError>;

    /// All notes visible to the session
    async fn list(&self, session: &SessionContext) -> Result<Vec<RemoteRecord>, RemoteError>;
}
