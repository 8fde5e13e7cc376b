//! Database migrations

use crate::error::Result;
use rusqlite::{Connection, OptionalExtension};

/// Current schema version
const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
pub fn run(conn: &mut Connection) -> Result<()> {
    let version = get_version(conn)?;

    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

/// Get the current schema version
fn get_version(conn: &Connection) -> Result<i32> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten()
        .unwrap_or(0);

    Ok(version)
}

/// Apply a list of statements in a single transaction
fn apply(conn: &mut Connection, version: i32, statements: &[&str]) -> Result<()> {
    let tx = conn.transaction()?;
    for stmt in statements {
        tx.execute_batch(stmt)?;
    }
    tx.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    tx.commit()?;

    tracing::info!("Migrated local database to version {version}");
    Ok(())
}

/// Migration to version 1: notes with sync bookkeeping
fn migrate_v1(conn: &mut Connection) -> Result<()> {
    apply(
        conn,
        1,
        &[
            "CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            )",
            "CREATE TABLE IF NOT EXISTS notes (
                local_id TEXT PRIMARY KEY,
                remote_id INTEGER UNIQUE,
                title TEXT NOT NULL,
                body TEXT NOT NULL,
                last_modified INTEGER NOT NULL,
                dirty INTEGER NOT NULL DEFAULT 1,
                deleted INTEGER NOT NULL DEFAULT 0
            )",
            "CREATE INDEX IF NOT EXISTS idx_notes_pending ON notes(dirty, deleted)",
            "CREATE INDEX IF NOT EXISTS idx_notes_modified ON notes(last_modified DESC)",
        ],
    )
}

/// Migration to version 2: persisted session credential
fn migrate_v2(conn: &mut Connection) -> Result<()> {
    apply(
        conn,
        CURRENT_VERSION,
        &["CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            username TEXT NOT NULL,
            token TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )"],
    )
}
