//! Entry and insight data types
//!
//! An `Entry` is one captured thought together with the structured insight
//! the provider produced for it at creation time. Entries are append-only:
//! after creation the only permitted mutation is deletion by id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A captured thought with its enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique identifier, monotonically assigned, never reused
    pub id: i64,
    /// Free-form text as submitted, immutable
    pub content: String,
    /// Short classification tag, e.g. "thought"
    #[serde(rename = "type")]
    pub kind: String,
    /// Creation timestamp, the only sort key
    pub created_at: DateTime<Utc>,
    /// Structured insight produced once at creation
    pub metadata: Insight,
}

/// Structured insight for a single entry
///
/// Stored as-is and never independently mutated. Every field defaults so that
/// absent or corrupt stored metadata deserializes to the empty-object form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

impl Insight {
    /// Parse stored metadata, falling back to the empty insight when the
    /// stored text is absent or corrupt.
    pub fn from_stored(raw: &str) -> Self {
        serde_json::from_str(raw).unwrap_or_default()
    }
}

/// Insight priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}
