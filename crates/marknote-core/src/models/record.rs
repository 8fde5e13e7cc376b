//! Local note record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::remote::{RemoteId, RemoteRecord};

/// Identity of a local row, using UUID v7 (time-sortable, never reused)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalId(Uuid);

impl LocalId {
    /// Create a new unique local ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for LocalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LocalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A note as kept in the local store, with its sync bookkeeping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRecord {
    /// Local identity, stable for the lifetime of the row
    pub local_id: LocalId,
    /// Identity assigned by the remote store after the first successful push
    pub remote_id: Option<RemoteId>,
    /// Note title
    pub title: String,
    /// Markdown body
    pub body: String,
    /// Last local mutation (Unix ms)
    pub last_modified: i64,
    /// Local content differs from the last state acknowledged by the remote
    pub dirty: bool,
    /// Tombstone awaiting remote delete confirmation
    pub deleted: bool,
}

impl LocalRecord {
    /// Create a new, never-pushed record
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            local_id: LocalId::new(),
            remote_id: None,
            title: title.into(),
            body: body.into(),
            last_modified: chrono::Utc::now().timestamp_millis(),
            dirty: true,
            deleted: false,
        }
    }

    /// Create a clean local copy of a record first seen during a pull
    #[must_use]
    pub fn from_remote(remote: &RemoteRecord) -> Self {
        Self {
            local_id: LocalId::new(),
            remote_id: Some(remote.id),
            title: remote.title.clone(),
            body: remote.body.clone(),
            last_modified: chrono::Utc::now().timestamp_millis(),
            dirty: false,
            deleted: false,
        }
    }

    /// Apply a user edit
    pub fn edit(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.title = title.into();
        self.body = body.into();
        self.dirty = true;
        self.touch();
    }

    /// Tombstone the record; it is removed once the remote confirms
    pub fn mark_deleted(&mut self) {
        self.deleted = true;
        self.dirty = true;
        self.touch();
    }

    /// Record a successful push under the given remote identity
    pub fn mark_synced(&mut self, remote_id: RemoteId) {
        self.remote_id = Some(remote_id);
        self.dirty = false;
    }

    /// Overwrite local content with the remote copy and mark it clean
    pub fn apply_remote(&mut self, remote: &RemoteRecord) {
        self.title.clone_from(&remote.title);
        self.body.clone_from(&remote.body);
        self.dirty = false;
        self.touch();
    }

    /// Whether title and body equal the remote copy
    #[must_use]
    pub fn content_matches(&self, remote: &RemoteRecord) -> bool {
        self.title == remote.title && self.body == remote.body
    }

    /// Whether the record has work for the push phase
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.dirty || self.deleted
    }

    /// A deletion that never reached the remote store
    #[must_use]
    pub const fn is_purgeable(&self) -> bool {
        self.deleted && self.remote_id.is_none()
    }

    /// Get first line of the body as a preview, truncated to `max_len` characters
    #[must_use]
    pub fn body_preview(&self, max_len: usize) -> String {
        self.body
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("")
            .trim()
            .chars()
            .take(max_len)
            .collect()
    }

    fn touch(&mut self) {
        self.last_modified = chrono::Utc::now().timestamp_millis();
    }
}
