//! Push-then-pull reconciliation between the local store and the remote store.
//!
//! # Push
//!
//! Every record from [`LocalStore::list_dirty`] is handled on its own:
//!
//! - a tombstone that never reached the remote is purged locally, no call made;
//! - a tombstone with a remote id is deleted remotely (`NotFound` counts as done);
//! - a record without a remote id is created and takes the assigned id;
//! - anything else is updated, and re-created if the remote copy is gone.
//!
//! Transient failures leave the record pending and are listed in the report.
//! The local row is only marked clean if it was not edited while the call was
//! in flight; otherwise the newer edit stays pending for the next run.
//! `Unauthorized` stops the run: no further push calls and no pull.
//!
//! # Pull
//!
//! The full remote list is merged record by record. Unknown records are
//! inserted, clean local copies take the remote content, and records with a
//! pending local change are left alone so the next push wins, including one
//! made while the pull runs. A record missing from the list is never deleted
//! locally.


use serde::Serialize;
use tokio::sync::Mutex;

use crate::db::LocalStore;
use crate::error::Result;
use crate::models::{LocalId, LocalRecord};
use crate::remote::{RemoteClient, RemoteError, RemoteErrorKind};
use crate::session::SessionContext;
use crate::state::SyncState;

/// Remote call a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOperation {
    Create,
    Update,
    Delete,
    List,
}

/// A remote call that failed and will be retried on the next sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    /// Record involved; `None` for the pull listing
    pub local_id: Option<LocalId>,
    pub operation: SyncOperation,
    pub kind: RemoteErrorKind,
    pub detail: String,
}

/// Summary of one `sync()` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Creates, updates and deletes confirmed by the remote
    pub pushed: usize,
    /// Local records inserted or overwritten from the remote list
    pub pulled: usize,
    /// Never-pushed tombstones dropped without a network call
    pub purged: usize,
    pub failures: Vec<SyncFailure>,
    /// The remote list could not be fetched; push results still stand
    pub pull_failed: bool,
    /// The credential was rejected; remaining work was skipped
    pub session_expired: bool,
}

impl SyncReport {
    /// Nothing failed and the session is still valid
    #[must_use]
    pub fn is_clean(&self) -> bool {
        !self.session_expired && !self.pull_failed && self.failures.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        if self.session_expired {
            SyncState::SessionExpired
        } else if self.failures.is_empty() {
            SyncState::Synced
        } else if self.pushed == 0
            && self
                .failures
                .iter()
                .all(|failure| failure.kind == RemoteErrorKind::Unreachable)
        {
            SyncState::Offline
        } else {
            SyncState::Partial
        }
    }

    fn record_failure(
        &mut self,
        local_id: Option<LocalId>,
        operation: SyncOperation,
        error: &RemoteError,
    ) {
        self.failures.push(SyncFailure {
            local_id,
            operation,
            kind: error.kind(),
            detail: error.to_string(),
        });
    }
}

/// Result of pushing a single record
enum PushStep {
    Pushed,
    Purged,
    Failed(SyncOperation, RemoteError),
}

/// Reconciles a [`LocalStore`] with a [`RemoteClient`].
///
/// At most one `sync()` runs at a time per engine; a second caller waits for
/// the first to finish.
pub struct ReconciliationEngine<S, R> {
    store: S,
    remote: R,
    sync_lock: Mutex<()>,
}

impl<S: LocalStore, R: RemoteClient> ReconciliationEngine<S, R> {
    pub fn new(store: S, remote: R) -> Self {
        Self {
            store,
            remote,
            sync_lock: Mutex::new(()),
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Push pending local changes, then pull the remote list.
    ///
    /// Remote failures never surface as `Err`; they are reported and retried
    /// on the next call. Only local storage failures abort with an error.
    pub async fn sync(&self, session: &SessionContext) -> Result<SyncReport> {
        let _guard = self.sync_lock.lock().await;
        let mut report = SyncReport::default();

        self.push(session, &mut report).await?;
        if report.session_expired {
            tracing::warn!("Sync aborted: session credential rejected during push");
            return Ok(report);
        }

        self.pull(session, &mut report).await?;

        tracing::info!(
            pushed = report.pushed,
            pulled = report.pulled,
            purged = report.purged,
            failures = report.failures.len(),
            session_expired = report.session_expired,
            "Sync finished"
        );
        Ok(report)
    }

    async fn push(&self, session: &SessionContext, report: &mut SyncReport) -> Result<()> {
        let pending = self.store.list_dirty()?;
        tracing::debug!("Pushing {} pending records", pending.len());

        for record in pending {
            let local_id = record.local_id;
            match self.push_record(session, record).await? {
                PushStep::Pushed => report.pushed += 1,
                PushStep::Purged => report.purged += 1,
                PushStep::Failed(_, RemoteError::Unauthorized) => {
                    report.session_expired = true;
                    break;
                }
                PushStep::Failed(operation, error) => {
                    tracing::warn!("Push of {local_id} failed ({operation:?}): {error}");
                    report.record_failure(Some(local_id), operation, &error);
                }
            }
        }

        Ok(())
    }

    async fn push_record(&self, session: &SessionContext, record: LocalRecord) -> Result<PushStep> {
        if record.is_purgeable() {
            self.store.remove(&record.local_id)?;
            tracing::debug!("Purged never-pushed note {}", record.local_id);
            return Ok(PushStep::Purged);
        }

        let Some(remote_id) = record.remote_id else {
            return self.push_create(session, record).await;
        };

        if record.deleted {
            return match self.remote.delete(session, remote_id).await {
                Ok(()) | Err(RemoteError::NotFound) => {
                    self.store.remove(&record.local_id)?;
                    tracing::debug!("Confirmed remote delete of {remote_id}");
                    Ok(PushStep::Pushed)
                }
                Err(error) => Ok(PushStep::Failed(SyncOperation::Delete, error)),
            };
        }

        match self
            .remote
            .update(session, remote_id, &record.title, &record.body)
            .await
        {
            Ok(()) => {
                let mut synced = record.clone();
                synced.dirty = false;
                if !self.store.replace_if_unchanged(&record, &synced)? {
                    tracing::debug!(
                        "Note {} changed while its update was in flight, keeping it pending",
                        record.local_id
                    );
                }
                Ok(PushStep::Pushed)
            }
            Err(RemoteError::NotFound) => {
                // Deleted elsewhere; the pending local edit wins.
                tracing::info!(
                    "Remote note {remote_id} is gone, re-creating it from {}",
                    record.local_id
                );
                self.push_create(session, record).await
            }
            Err(error) => Ok(PushStep::Failed(SyncOperation::Update, error)),
        }
    }

    async fn push_create(&self, session: &SessionContext, record: LocalRecord) -> Result<PushStep> {
        match self
            .remote
            .create(session, &record.title, &record.body)
            .await
        {
            Ok(created) => {
                tracing::debug!("Note {} now maps to remote {}", record.local_id, created.id);
                let mut synced = record.clone();
                synced.mark_synced(created.id);
                if !self.store.replace_if_unchanged(&record, &synced)? {
                    // Keep the newer edit pending; the next push updates this remote id.
                    self.store.assign_remote_id(&record.local_id, created.id)?;
                    tracing::debug!(
                        "Note {} changed while its create was in flight, keeping it pending",
                        record.local_id
                    );
                }
                Ok(PushStep::Pushed)
            }
            Err(error) => Ok(PushStep::Failed(SyncOperation::Create, error)),
        }
    }

    async fn pull(&self, session: &SessionContext, report: &mut SyncReport) -> Result<()> {
        let remote_records = match self.remote.list(session).await {
            Ok(records) => records,
            Err(RemoteError::Unauthorized) => {
                tracing::warn!("Pull skipped: session credential rejected");
                report.session_expired = true;
                return Ok(());
            }
            Err(error) => {
                tracing::warn!("Pull failed: {error}");
                report.pull_failed = true;
                report.record_failure(None, SyncOperation::List, &error);
                return Ok(());
            }
        };

        for remote in &remote_records {
            match self.store.find_by_remote_id(remote.id)? {
                None => {
                    self.store.upsert(&LocalRecord::from_remote(remote))?;
                    report.pulled += 1;
                }
                Some(local) if local.is_pending() => {
                    tracing::debug!(
                        "Keeping pending local change of {} over remote {}",
                        local.local_id,
                        remote.id
                    );
                }
                Some(local) if local.content_matches(remote) => {}
                Some(local) => {
                    let mut updated = local.clone();
                    updated.apply_remote(remote);
                    if self.store.replace_if_unchanged(&local, &updated)? {
                        report.pulled += 1;
                    } else {
                        tracing::debug!(
                            "Note {} was edited during pull, keeping the local change",
                            local.local_id
                        );
                    }
                }
            }
        }

        Ok(())
    }
}
