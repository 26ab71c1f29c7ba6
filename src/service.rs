//! Entry service
//!
//! Mediates between the HTTP surface and the store: validates input, obtains
//! an insight from the provider, and persists the enriched entry. Provider
//! failure leaves the store untouched so no partial entries exist.

use crate::entry::{Entry, Insight};
use crate::error::{Error, Result};
use crate::insight::InsightProvider;
use crate::settings::SettingsStore;
use crate::store::EntryStore;
use std::sync::Arc;

/// Create, list, and delete entries
pub struct EntryService {
    store: Arc<dyn EntryStore>,
    provider: Arc<dyn InsightProvider>,
    settings: Arc<SettingsStore>,
}

impl EntryService {
    /// Create a new entry service
    pub fn new(
        store: Arc<dyn EntryStore>,
        provider: Arc<dyn InsightProvider>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            store,
            provider,
            settings,
        }
    }

    /// Classify the content through the insight provider and persist it.
    ///
    /// Empty or whitespace-only content is rejected before any side effect.
    /// A provider failure inserts nothing.
    pub async fn submit(&self, content: &str, kind: &str) -> Result<Entry> {
        validate_content(content)?;

        let key = self.settings.effective_key().await;
        let locale = self.settings.snapshot().await.locale;
        let insight = self.provider.classify(content, &key, locale).await?;

        let entry = self.store.insert(content, kind, insight).await?;
        tracing::info!(id = entry.id, kind, "Captured entry");
        Ok(entry)
    }

    /// Persist an entry with caller-supplied metadata, skipping the provider
    pub async fn record(&self, content: &str, kind: &str, metadata: Insight) -> Result<Entry> {
        validate_content(content)?;
        let entry = self.store.insert(content, kind, metadata).await?;
        tracing::info!(id = entry.id, kind, "Recorded entry");
        Ok(entry)
    }

    /// All entries, newest first
    pub async fn list_all(&self) -> Result<Vec<Entry>> {
        self.store.list().await
    }

    /// Delete by id; idempotent
    pub async fn remove(&self, id: i64) -> Result<()> {
        self.store.delete(id).await
    }

    /// The insight provider (shared with the view layer)
    pub fn provider(&self) -> &Arc<dyn InsightProvider> {
        &self.provider
    }

    /// The settings store (shared with the view layer)
    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(Error::Validation("content must not be empty".to_string()));
    }
    Ok(())
}
