//! SQLite entry store
//!
//! One `entries` table with an AUTOINCREMENT primary key; metadata is held in
//! a TEXT column as serialized JSON. Inserts and deletes are single-row
//! statements, so SQLite's native atomicity covers concurrent requests
//! without any cross-entry coordination.

use super::EntryStore;
use crate::entry::{Entry, Insight};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    content TEXT NOT NULL,
    type TEXT NOT NULL,
    created_at TEXT NOT NULL,
    metadata TEXT NOT NULL DEFAULT '{}'
)";

/// Relational entry store backed by SQLite
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| Error::Storage(format!("failed to open database: {}", e)))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::Storage(format!("failed to apply schema: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (tests)
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::Storage(format!("failed to open database: {}", e)))?;
        conn.execute_batch(SCHEMA)
            .map_err(|e| Error::Storage(format!("failed to apply schema: {}", e)))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl EntryStore for SqliteStore {
    async fn list(&self) -> Result<Vec<Entry>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn
            .prepare(
                "SELECT id, content, type, created_at, metadata \
                 FROM entries ORDER BY created_at DESC, id DESC",
            )
            .map_err(|e| Error::Storage(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                let created_at: String = row.get(3)?;
                let metadata: String = row.get(4)?;
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    created_at,
                    metadata,
                ))
            })
            .map_err(|e| Error::Storage(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, content, kind, created_at, metadata) =
                row.map_err(|e| Error::Storage(e.to_string()))?;
            entries.push(Entry {
                id,
                content,
                kind,
                created_at: parse_timestamp(&created_at)?,
                metadata: Insight::from_stored(&metadata),
            });
        }
        Ok(entries)
    }

    async fn insert(&self, content: &str, kind: &str, metadata: Insight) -> Result<Entry> {
        let created_at = Utc::now();
        let metadata_json = serde_json::to_string(&metadata)
            .map_err(|e| Error::Storage(format!("failed to serialize metadata: {}", e)))?;

        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO entries (content, type, created_at, metadata) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![content, kind, created_at.to_rfc3339(), metadata_json],
        )
        .map_err(|e| Error::Storage(format!("failed to insert entry: {}", e)))?;

        let id = conn.last_insert_rowid();
        tracing::debug!(id, kind, "Inserted entry");

        Ok(Entry {
            id,
            content: content.to_string(),
            kind: kind.to_string(),
            created_at,
            metadata,
        })
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        let affected = conn
            .execute("DELETE FROM entries WHERE id = ?1", [id])
            .map_err(|e| Error::Storage(format!("failed to delete entry: {}", e)))?;
        if affected > 0 {
            tracing::debug!(id, "Deleted entry");
        }
        Ok(())
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::Storage(format!("invalid stored timestamp '{}': {}", raw, e)))
}
