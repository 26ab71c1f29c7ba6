//! Lumina configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Main Lumina configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LuminaConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Insight provider configuration
    #[serde(default)]
    pub insight: InsightConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

impl LuminaConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = allow any)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

/// Insight provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Shared default API key (user-supplied keys from settings take precedence)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Generative Language API
    pub base_url: String,

    /// Model used for classification and focus summaries
    pub model: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            timeout_secs: 45,
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory for the database, journal, and persisted settings
    pub data_dir: PathBuf,

    /// Store backing: sqlite or journal
    pub backend: StoreBackend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: StoreBackend::Sqlite,
        }
    }
}

/// Which entry store backing to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Relational table with an autoincrement primary key
    Sqlite,
    /// Single serialized JSON blob with an in-process id counter
    Journal,
}

/// Default data directory (~/.lumina)
pub fn default_data_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lumina")
}

/// Supported UI locales
///
/// The locale selects the language of provider prompts and of the static
/// fallback strings. French is the default, matching the original product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// French
    #[default]
    Fr,
    /// English
    En,
}

impl Locale {
    /// Static default shown when the focus summary cannot be generated
    pub fn default_focus(&self) -> &'static str {
        match self {
            Locale::Fr => "Concentrez-vous sur votre tâche la plus importante aujourd'hui.",
            Locale::En => "Focus on your most impactful task today.",
        }
    }

    /// Placeholder shown before any entries exist
    pub fn focus_pending(&self) -> &'static str {
        match self {
            Locale::Fr => "Définition de votre intention...",
            Locale::En => "Setting your intention...",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Fr => write!(f, "fr"),
            Locale::En => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fr" => Ok(Locale::Fr),
            "en" => Ok(Locale::En),
            other => Err(Error::Config(format!("Unsupported locale: {}", other))),
        }
    }
}
