//! Local note store

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{LocalId, LocalRecord, RemoteId};

const RECORD_COLUMNS: &str = "local_id, remote_id, title, body, last_modified, dirty, deleted";

/// Storage contract used by the reconciliation engine.
///
/// Every call is atomic for the record it touches.
pub trait LocalStore {
    /// All records with pending work: dirty content or an unconfirmed tombstone
    fn list_dirty(&self) -> Result<Vec<LocalRecord>>;

    /// Insert or replace a record by `local_id`
    fn upsert(&self, record: &LocalRecord) -> Result<()>;

    /// Replace the stored row with `record` only while it still holds the
    /// content of `expected`. Returns `false` if a newer local write won.
    fn replace_if_unchanged(&self, expected: &LocalRecord, record: &LocalRecord) -> Result<bool>;

    /// Attach a remote identity, leaving content and flags as they are
    fn assign_remote_id(&self, local_id: &LocalId, remote_id: RemoteId) -> Result<()>;

    /// Remove a record permanently
    fn remove(&self, local_id: &LocalId) -> Result<()>;

    /// Find the record mapped to a remote identity, tombstones included
    fn find_by_remote_id(&self, id: RemoteId) -> Result<Option<LocalRecord>>;

    /// All records not marked deleted, most recently modified first
    fn list_active(&self) -> Result<Vec<LocalRecord>>;
}

/// `SQLite` implementation of `LocalStore`, plus the user-facing note operations
pub struct SqliteLocalStore {
    db: Database,
}

impl SqliteLocalStore {
    /// Wrap an opened database
    pub const fn new(db: Database) -> Self {
        Self { db }
    }

    /// Open (or create) the store at the given path
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(Database::open(path)?))
    }

    /// Open an in-memory store (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// The database backing this store
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// Fetch a record by local id, tombstones included
    pub fn get(&self, local_id: &LocalId) -> Result<Option<LocalRecord>> {
        let conn = self.db.connection()?;
        Self::get_with(&conn, local_id)
    }

    /// Create a new note; it stays dirty until the next successful push
    pub fn create_note(&self, title: &str, body: &str) -> Result<LocalRecord> {
        let title = normalize_title(title)?;
        let record = LocalRecord::new(title, body);
        self.upsert(&record)?;
        tracing::debug!("Created local note {}", record.local_id);
        Ok(record)
    }

    /// Apply a user edit to an existing, non-deleted note
    pub fn edit_note(&self, local_id: &LocalId, title: &str, body: &str) -> Result<LocalRecord> {
        let title = normalize_title(title)?;
        let mut record = self
            .get(local_id)?
            .filter(|record| !record.deleted)
            .ok_or_else(|| Error::NotFound(local_id.to_string()))?;

        record.edit(title, body);
        self.upsert(&record)?;
        Ok(record)
    }

    /// Tombstone a note; the next sync confirms the delete remotely or purges it
    pub fn delete_note(&self, local_id: &LocalId) -> Result<()> {
        let mut record = self
            .get(local_id)?
            .filter(|record| !record.deleted)
            .ok_or_else(|| Error::NotFound(local_id.to_string()))?;

        record.mark_deleted();
        self.upsert(&record)
    }

    /// Local ids of non-deleted notes starting with `prefix`
    pub fn find_ids_by_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<LocalId>> {
        let pattern = format!("{}%", escape_like(prefix.trim()));
        let conn = self.db.connection()?;
        let mut stmt = conn.prepare(
            "SELECT local_id FROM notes
             WHERE local_id LIKE ?1 ESCAPE '\\' AND deleted = 0
             ORDER BY local_id
             LIMIT ?2",
        )?;

        let ids = stmt
            .query_map(params![pattern, to_sql_limit(limit)], |row| {
                parse_local_id(row, 0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(ids)
    }

    /// Number of records with pending push work
    pub fn count_pending(&self) -> Result<usize> {
        let conn = self.db.connection()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE dirty = 1 OR deleted = 1",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Drop every local note, synced or not
    pub fn clear(&self) -> Result<usize> {
        let conn = self.db.connection()?;
        Ok(conn.execute("DELETE FROM notes", [])?)
    }

    fn get_with(conn: &Connection, local_id: &LocalId) -> Result<Option<LocalRecord>> {
        let record = conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM notes WHERE local_id = ?1"),
                params![local_id.as_str()],
                parse_record,
            )
            .optional()?;
        Ok(record)
    }

    fn query_records(&self, sql: &str) -> Result<Vec<LocalRecord>> {
        let conn = self.db.connection()?;
        let mut stmt = conn.prepare(sql)?;
        let records = stmt
            .query_map([], parse_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }
}

impl LocalStore for SqliteLocalStore {
    fn list_dirty(&self) -> Result<Vec<LocalRecord>> {
        self.query_records(&format!(
            "SELECT {RECORD_COLUMNS} FROM notes
             WHERE dirty = 1 OR deleted = 1
             ORDER BY last_modified ASC"
        ))
    }

    fn upsert(&self, record: &LocalRecord) -> Result<()> {
        let conn = self.db.connection()?;
        conn.execute(
            "INSERT INTO notes (local_id, remote_id, title, body, last_modified, dirty, deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(local_id) DO UPDATE SET
                remote_id = excluded.remote_id,
                title = excluded.title,
                body = excluded.body,
                last_modified = excluded.last_modified,
                dirty = excluded.dirty,
                deleted = excluded.deleted",
            params![
                record.local_id.as_str(),
                record.remote_id.map(RemoteId::value),
                record.title,
                record.body,
                record.last_modified,
                record.dirty,
                record.deleted,
            ],
        )?;
        Ok(())
    }

    fn replace_if_unchanged(&self, expected: &LocalRecord, record: &LocalRecord) -> Result<bool> {
        let conn = self.db.connection()?;
        let changed = conn.execute(
            "UPDATE notes SET
                remote_id = ?1, title = ?2, body = ?3, last_modified = ?4, dirty = ?5, deleted = ?6
             WHERE local_id = ?7
               AND last_modified = ?8 AND title = ?9 AND body = ?10 AND deleted = ?11",
            params![
                record.remote_id.map(RemoteId::value),
                record.title,
                record.body,
                record.last_modified,
                record.dirty,
                record.deleted,
                expected.local_id.as_str(),
                expected.last_modified,
                expected.title,
                expected.body,
                expected.deleted,
            ],
        )?;
        Ok(changed == 1)
    }

    fn assign_remote_id(&self, local_id: &LocalId, remote_id: RemoteId) -> Result<()> {
        let conn = self.db.connection()?;
        conn.execute(
            "UPDATE notes SET remote_id = ?1 WHERE local_id = ?2",
            params![remote_id.value(), local_id.as_str()],
        )?;
        Ok(())
    }

    fn remove(&self, local_id: &LocalId) -> Result<()> {
        let conn = self.db.connection()?;
        conn.execute(
            "DELETE FROM notes WHERE local_id = ?1",
            params![local_id.as_str()],
        )?;
        Ok(())
    }

    fn find_by_remote_id(&self, id: RemoteId) -> Result<Option<LocalRecord>> {
        let conn = self.db.connection()?;
        let record = conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM notes WHERE remote_id = ?1"),
                params![id.value()],
                parse_record,
            )
            .optional()?;
        Ok(record)
    }

    fn list_active(&self) -> Result<Vec<LocalRecord>> {
        self.query_records(&format!(
            "SELECT {RECORD_COLUMNS} FROM notes
             WHERE deleted = 0
             ORDER BY last_modified DESC"
        ))
    }
}

fn normalize_title(title: &str) -> Result<&str> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::InvalidInput("Note title cannot be empty".to_string()));
    }
    Ok(title)
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn to_sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn parse_local_id(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<LocalId> {
    let raw: String = row.get(index)?;
    raw.parse()
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

/// Parse a record from a row selected with `RECORD_COLUMNS`
fn parse_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<LocalRecord> {
    Ok(LocalRecord {
        local_id: parse_local_id(row, 0)?,
        remote_id: row.get::<_, Option<i64>>(1)?.map(RemoteId::new),
        title: row.get(2)?,
        body: row.get(3)?,
        last_modified: row.get(4)?,
        dirty: row.get(5)?,
        deleted: row.get(6)?,
    })
}
