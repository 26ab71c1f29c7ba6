//! Journal entry store
//!
//! Local-persistence variant: the whole collection lives in memory and is
//! written out as a single JSON blob after every mutation. The id counter is
//! seeded at load time to `max(existing ids) + 1` (0 for an empty store), so
//! ids never collide across sessions without any global mutable counter.

use super::EntryStore;
use crate::entry::{Entry, Insight};
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// JSON-blob entry store
pub struct JournalStore {
    path: PathBuf,
    inner: RwLock<Journal>,
}

struct Journal {
    entries: Vec<Entry>,
    next_id: i64,
}

impl JournalStore {
    /// Open the journal at the given path, loading existing entries.
    ///
    /// A missing or unreadable blob yields an empty store; ids restart at 0
    /// only when no entry survives.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<Entry>>(&raw) {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!("Journal {} is corrupt, starting empty: {}", path.display(), e);
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };

        let next_id = entries.iter().map(|e| e.id).max().map_or(0, |max| max + 1);

        Ok(Self {
            path,
            inner: RwLock::new(Journal { entries, next_id }),
        })
    }

    async fn persist(&self, entries: &[Entry]) -> Result<()> {
        let json = serde_json::to_string(entries)
            .map_err(|e| Error::Storage(format!("failed to serialize journal: {}", e)))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| Error::Storage(format!("failed to write journal: {}", e)))
    }
}

#[async_trait]
impl EntryStore for JournalStore {
    async fn list(&self) -> Result<Vec<Entry>> {
        let inner = self.inner.read().await;
        let mut entries = inner.entries.clone();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(entries)
    }

    async fn insert(&self, content: &str, kind: &str, metadata: Insight) -> Result<Entry> {
        let mut inner = self.inner.write().await;
        let entry = Entry {
            id: inner.next_id,
            content: content.to_string(),
            kind: kind.to_string(),
            created_at: Utc::now(),
            metadata,
        };

        inner.entries.push(entry.clone());
        if let Err(e) = self.persist(&inner.entries).await {
            // Failed mutations must not leave a phantom entry in memory
            inner.entries.pop();
            return Err(e);
        }
        inner.next_id += 1;

        tracing::debug!(id = entry.id, kind, "Appended entry to journal");
        Ok(entry)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        let before = inner.entries.len();
        inner.entries.retain(|e| e.id != id);
        if inner.entries.len() == before {
            return Ok(());
        }

        self.persist(&inner.entries).await?;
        tracing::debug!(id, "Removed entry from journal");
        Ok(())
    }
}
