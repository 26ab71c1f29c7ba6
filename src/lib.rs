//! Lumina - AI-Assisted Personal Note Capture
//!
//! Lumina is a small self-hosted service for capturing free-form thoughts.
//! Each submission is classified and enriched by a language-model provider,
//! persisted, and served back to a dashboard together with a daily focus
//! summary derived from the most recent entries.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      HTTP API (axum)                      │
//! │   /api/entries    /api/focus    /api/v1/settings          │
//! └───────────────┬───────────────────────┬──────────────────┘
//!                 │                       │
//!        ┌────────▼────────┐     ┌────────▼────────┐
//!        │    Workspace    │     │  SettingsStore  │
//!        │  cached entries │     │ locale + keys   │
//!        │  daily focus    │     └────────┬────────┘
//!        └────────┬────────┘              │
//!                 │                       │
//!        ┌────────▼────────┐     ┌────────▼────────┐
//!        │  EntryService   ├─────►  InsightProvider │
//!        │ validate/enrich │     │  (Gemini REST)   │
//!        └────────┬────────┘     └─────────────────┘
//!                 │
//!        ┌────────▼────────┐
//!        │   EntryStore    │
//!        │ SQLite │ journal│
//!        └─────────────────┘
//! ```
//!
//! ## Key Features
//!
//! - Thought capture with LLM classification (category, priority, summary,
//!   suggested next steps)
//! - Daily focus line summarizing the five most recent entries
//! - SQLite or single-file JSON journal persistence
//! - Per-user locale and API key, with a shared fallback credential

pub mod api;
pub mod config;
pub mod entry;
pub mod error;
pub mod insight;
pub mod service;
pub mod settings;
pub mod store;
pub mod workspace;

pub use config::LuminaConfig;
pub use error::{Error, Result};
