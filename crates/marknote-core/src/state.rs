//! Shared cross-client state types.

use serde::Serialize;

/// Overall outcome of the last sync, as shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    /// Everything pushed and pulled
    Synced,
    /// Some records failed; they are retried on the next sync
    Partial,
    /// The remote store could not be reached at all
    Offline,
    /// The credential was rejected; sign in again
    SessionExpired,
}
