//! Process-wide settings
//!
//! The locale and the optional personal API key are read from a persisted
//! TOML file at startup and mutable through the settings API. A shared
//! default key (from configuration or environment) backs submissions when no
//! personal key is set.

pub mod handler;
pub mod types;

pub use handler::{settings_router, SettingsState};
pub use types::mask_api_key;

use crate::config::Locale;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// A point-in-time view of the mutable settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Prompt and fallback-string language
    #[serde(default)]
    pub locale: Locale,
    /// Personal API key, overriding the shared default when set
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Persisted settings with a shared fallback credential
pub struct SettingsStore {
    path: PathBuf,
    shared_key: Option<String>,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Load persisted settings from the data directory.
    ///
    /// A missing or corrupt file yields the defaults; the file is created on
    /// the first update.
    pub fn load(data_dir: &Path, shared_key: Option<String>) -> Self {
        let path = data_dir.join("settings.toml");
        let current = match std::fs::read_to_string(&path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(settings) => settings,
                Err(e) => {
                    tracing::warn!(
                        "Settings file {} is corrupt, using defaults: {}",
                        path.display(),
                        e
                    );
                    Settings::default()
                }
            },
            Err(_) => Settings::default(),
        };

        Self {
            path,
            shared_key,
            current: RwLock::new(current),
        }
    }

    /// Current settings snapshot
    pub async fn snapshot(&self) -> Settings {
        self.current.read().await.clone()
    }

    /// The credential submissions will use: personal key if set, else the
    /// shared default, else empty (provider calls then fail cleanly).
    pub async fn effective_key(&self) -> String {
        let current = self.current.read().await;
        current
            .api_key
            .clone()
            .or_else(|| self.shared_key.clone())
            .unwrap_or_default()
    }

    /// Where the effective credential comes from
    pub async fn key_source(&self) -> &'static str {
        let current = self.current.read().await;
        if current.api_key.is_some() {
            "personal"
        } else if self.shared_key.is_some() {
            "shared"
        } else {
            "none"
        }
    }

    /// Apply a partial update and persist. An empty api_key clears the
    /// personal key. The in-memory settings only change once the file is
    /// written, so a persist failure leaves the served settings matching disk.
    pub async fn update(
        &self,
        locale: Option<Locale>,
        api_key: Option<String>,
    ) -> Result<Settings> {
        let mut current = self.current.write().await;

        let mut next = current.clone();
        if let Some(locale) = locale {
            next.locale = locale;
        }
        if let Some(key) = api_key {
            next.api_key = if key.is_empty() { None } else { Some(key) };
        }

        self.persist(&next).await?;
        *current = next.clone();
        Ok(next)
    }

    async fn persist(&self, settings: &Settings) -> Result<()> {
        let toml = toml::to_string_pretty(settings)
            .map_err(|e| Error::Storage(format!("failed to serialize settings: {}", e)))?;
        tokio::fs::write(&self.path, toml)
            .await
            .map_err(|e| Error::Storage(format!("failed to write settings: {}", e)))
    }
}
