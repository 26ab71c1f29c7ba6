//! Durable entry storage
//!
//! Two behaviorally equivalent backings implement [`EntryStore`]:
//! - [`SqliteStore`]: a relational table keyed by an autoincrement primary
//!   key, metadata held in a serialized text column.
//! - [`JournalStore`]: the whole collection serialized as one JSON blob, with
//!   an in-process id counter seeded from the existing ids at load time.

mod journal;
mod sqlite;

pub use journal::JournalStore;
pub use sqlite::SqliteStore;

use crate::config::{StorageConfig, StoreBackend};
use crate::entry::{Entry, Insight};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Contract for durable entry storage
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// All entries, sorted by `created_at` descending (newest first).
    /// Ties break on id so ordering always reflects insertion order.
    async fn list(&self) -> Result<Vec<Entry>>;

    /// Assign the next unique id, persist, and return the stored entry.
    /// Fails with `Error::Storage` when the medium is unwritable.
    async fn insert(&self, content: &str, kind: &str, metadata: Insight) -> Result<Entry>;

    /// Remove the entry with the matching id if present.
    /// A missing id is a no-op, never an error.
    async fn delete(&self, id: i64) -> Result<()>;
}

/// Open the store backing selected in the configuration
pub async fn open_store(storage: &StorageConfig) -> Result<Arc<dyn EntryStore>> {
    tokio::fs::create_dir_all(&storage.data_dir).await?;
    match storage.backend {
        StoreBackend::Sqlite => {
            let store = SqliteStore::open(storage.data_dir.join("lumina.db"))?;
            Ok(Arc::new(store))
        }
        StoreBackend::Journal => {
            let store = JournalStore::open(storage.data_dir.join("entries.json"))?;
            Ok(Arc::new(store))
        }
    }
}
