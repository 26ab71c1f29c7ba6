//! Settings wire types
//!
//! API-facing settings schema with camelCase JSON serialization. The personal
//! API key is masked in responses (first 8 + last 4 characters visible).

use crate::config::Locale;
use serde::{Deserialize, Serialize};

/// Settings response (API key masked)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub locale: Locale,
    pub api_key: String,
    /// Which credential submissions will use: "personal", "shared", or "none"
    pub key_source: String,
}

/// Partial update request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    pub locale: Option<Locale>,
    /// New personal key; an empty string clears it
    pub api_key: Option<String>,
}

/// Key validation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateKeyRequest {
    pub api_key: String,
}

/// Key validation result
#[derive(Debug, Serialize)]
pub struct ValidateKeyResponse {
    pub valid: bool,
}

/// Mask an API key for display: show first 8 + last 4 chars.
/// Counts characters, not bytes, so multi-byte keys mask cleanly.
pub fn mask_api_key(key: &str) -> String {
    if key.is_empty() {
        return String::new();
    }
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "****".to_string();
    }
    let prefix: String = chars[..8].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{}****{}", prefix, suffix)
}
