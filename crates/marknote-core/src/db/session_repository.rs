//! Session repository implementation

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::Result;
use crate::session::SessionContext;

/// Trait for persisting the signed-in session
pub trait SessionRepository {
    /// Load the stored session, if any
    fn load(&self) -> Result<Option<SessionContext>>;

    /// Store a session, replacing any previous one
    fn save(&self, session: &SessionContext) -> Result<()>;

    /// Forget the stored session
    fn clear(&self) -> Result<()>;
}

/// `SQLite` implementation of `SessionRepository`
pub struct SqliteSessionRepository<'a> {
    db: &'a Database,
}

impl<'a> SqliteSessionRepository<'a> {
    /// Create a new repository over the given database
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

impl SessionRepository for SqliteSessionRepository<'_> {
    fn load(&self) -> Result<Option<SessionContext>> {
        let conn = self.db.connection()?;
        let session = conn
            .query_row(
                "SELECT username, token, created_at FROM sessions WHERE id = 1",
                [],
                |row| {
                    Ok(SessionContext {
                        username: row.get(0)?,
                        token: row.get(1)?,
                        issued_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(session)
    }

    fn save(&self, session: &SessionContext) -> Result<()> {
        let conn = self.db.connection()?;
        conn.execute(
            "INSERT OR REPLACE INTO sessions (id, username, token, created_at) VALUES (1, ?1, ?2, ?3)",
            params![session.username, session.token, session.issued_at],
        )?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.db.connection()?;
        conn.execute("DELETE FROM sessions", [])?;
        Ok(())
    }
}
