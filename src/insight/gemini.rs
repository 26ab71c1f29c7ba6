//! Gemini-backed insight provider
//!
//! Talks to the Google Generative Language `generateContent` endpoint. The
//! classification call forces a JSON response schema matching [`Insight`];
//! the focus call is free-form text. Prompts exist in both supported locales.

use super::InsightProvider;
use crate::config::{InsightConfig, Locale};
use crate::entry::Insight;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// Insight provider backed by the Gemini API
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a provider from the insight configuration
    pub fn new(config: &InsightConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Insight(format!("failed to construct HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }

    async fn generate(&self, api_key: &str, payload: Value) -> Result<Value> {
        if api_key.is_empty() {
            return Err(Error::Insight("API key is not configured".to_string()));
        }

        let response = self
            .client
            .post(self.endpoint(api_key))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Insight(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Insight(format!(
                "API returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Insight(format!("malformed response: {}", e)))
    }
}

#[async_trait]
impl InsightProvider for GeminiProvider {
    async fn classify(&self, text: &str, api_key: &str, locale: Locale) -> Result<Insight> {
        let payload = classify_payload(text, locale);
        let body = self.generate(api_key, payload).await?;

        let raw = extract_text(&body)
            .ok_or_else(|| Error::Insight("response contains no candidate text".to_string()))?;

        serde_json::from_str(&raw)
            .map_err(|e| Error::Insight(format!("response is not a valid insight: {}", e)))
    }

    async fn summarize_focus(&self, recent: &str, api_key: &str, locale: Locale) -> String {
        let payload = focus_payload(recent, locale);
        match self.generate(api_key, payload).await {
            Ok(body) => match extract_text(&body) {
                Some(text) if !text.trim().is_empty() => text.trim().to_string(),
                _ => locale.default_focus().to_string(),
            },
            Err(e) => {
                tracing::warn!("Focus summary failed, using default: {}", e);
                locale.default_focus().to_string()
            }
        }
    }

    async fn validate_credentials(&self, candidate: &str) -> bool {
        if candidate.trim().is_empty() {
            return false;
        }

        let payload = json!({
            "contents": [{"role": "user", "parts": [{"text": "hi"}]}],
            "generationConfig": {"maxOutputTokens": 1}
        });

        match self.generate(candidate, payload).await {
            Ok(body) => extract_text(&body).is_some(),
            Err(e) => {
                tracing::debug!("API key validation failed: {}", e);
                false
            }
        }
    }
}

fn system_instruction(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => {
            "Vous êtes Lumina, un système d'exploitation de vie intelligent. Catégorisez les \
             pensées en 'travail', 'personnel', 'créatif' ou 'santé'. Fournissez un résumé et \
             2-3 étapes concrètes suivantes."
        }
        Locale::En => {
            "You are Lumina, an intelligent life operating system. Categorize thoughts into \
             'work', 'personal', 'creative', or 'health'. Provide a summary and 2-3 actionable \
             next steps."
        }
    }
}

fn classify_payload(text: &str, locale: Locale) -> Value {
    let prompt = match locale {
        Locale::Fr => format!(
            "Analysez cette pensée et extrayez des informations structurées : \"{}\"",
            text
        ),
        Locale::En => format!(
            "Analyze this thought and extract structured insights: \"{}\"",
            text
        ),
    };

    json!({
        "systemInstruction": {"parts": [{"text": system_instruction(locale)}]},
        "contents": [{"role": "user", "parts": [{"text": prompt}]}],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "category": {"type": "STRING"},
                    "priority": {"type": "STRING", "enum": ["low", "medium", "high"]},
                    "summary": {"type": "STRING"},
                    "nextSteps": {"type": "ARRAY", "items": {"type": "STRING"}}
                },
                "required": ["category", "priority", "summary", "nextSteps"]
            }
        }
    })
}

fn focus_payload(recent: &str, locale: Locale) -> Value {
    let prompt = match locale {
        Locale::Fr => format!(
            "Basé sur ces pensées récentes : {}, quel devrait être l'objectif principal pour \
             aujourd'hui ? Restez inspirant et faites moins de 30 mots.",
            recent
        ),
        Locale::En => format!(
            "Based on these recent thoughts: {}, what should be the primary focus for today? \
             Keep it inspiring and under 30 words.",
            recent
        ),
    };

    json!({
        "contents": [{"role": "user", "parts": [{"text": prompt}]}]
    })
}

/// Pull the first candidate's text out of a generateContent response
fn extract_text(body: &Value) -> Option<String> {
    body.get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .get(0)?
        .get("text")?
        .as_str()
        .map(|s| s.to_string())
}
