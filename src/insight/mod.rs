//! Insight provider
//!
//! The "intelligence" of Lumina is delegated to a hosted model API behind the
//! [`InsightProvider`] trait, so the rest of the system (and every test) can
//! treat it as a capability-typed collaborator and substitute a deterministic
//! implementation.

mod gemini;

pub use gemini::GeminiProvider;

use crate::config::Locale;
use crate::entry::Insight;
use crate::error::Result;
use async_trait::async_trait;

/// External collaborator that classifies thoughts and summarizes focus
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Classify a thought into a structured insight.
    ///
    /// Fails with `Error::Insight` on network failure, malformed response, or
    /// quota/auth rejection. Never returns partial data.
    async fn classify(&self, text: &str, api_key: &str, locale: Locale) -> Result<Insight>;

    /// Summarize the most recent thoughts into a one-line daily focus.
    ///
    /// Best-effort: any failure degrades to the static locale default rather
    /// than propagating an error.
    async fn summarize_focus(&self, recent: &str, api_key: &str, locale: Locale) -> String;

    /// Check a candidate API key with a minimal-cost round trip.
    /// Returns false, never an error, on any failure.
    async fn validate_credentials(&self, candidate: &str) -> bool;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Deterministic provider used by service, workspace, and router tests.

    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider returning a fixed insight, or failing every call
    pub struct StaticProvider {
        pub insight: Insight,
        pub fail: bool,
        pub focus: String,
        pub classify_calls: AtomicUsize,
        pub focus_calls: AtomicUsize,
    }

    impl StaticProvider {
        pub fn returning(insight: Insight) -> Self {
            Self {
                insight,
                fail: false,
                focus: "focus line".to_string(),
                classify_calls: AtomicUsize::new(0),
                focus_calls: AtomicUsize::new(0),
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::returning(Insight::default())
            }
        }
    }

    #[async_trait]
    impl InsightProvider for StaticProvider {
        async fn classify(&self, _text: &str, _api_key: &str, _locale: Locale) -> Result<Insight> {
            self.classify_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Insight("provider unavailable".to_string()));
            }
            Ok(self.insight.clone())
        }

        async fn summarize_focus(&self, _recent: &str, _api_key: &str, locale: Locale) -> String {
            self.focus_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return locale.default_focus().to_string();
            }
            self.focus.clone()
        }

        async fn validate_credentials(&self, _candidate: &str) -> bool {
            !self.fail
        }
    }
}
