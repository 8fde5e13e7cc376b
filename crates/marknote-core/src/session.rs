//! Session credential handed to the sync engine.
//!
//! A `SessionContext` is produced by the auth shell (see [`crate::auth`]) and
//! passed explicitly into every remote call. Nothing in the crate keeps a
//! "current token" of its own.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub username: String,
    pub token: String,
    /// When the token was obtained (Unix ms)
    pub issued_at: i64,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            issued_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Bearer token for the `Authorization` header
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionContext")
            .field("username", &self.username)
            .field("token", &"[REDACTED]")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}
