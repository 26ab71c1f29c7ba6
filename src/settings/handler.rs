//! HTTP handlers for the Settings API
//!
//! - GET   /api/v1/settings              — current settings (API key masked)
//! - PATCH /api/v1/settings              — update locale and/or personal key
//! - POST  /api/v1/settings/validate-key — check a candidate key

use crate::insight::InsightProvider;
use crate::settings::types::*;
use crate::settings::SettingsStore;
use crate::workspace::Workspace;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use std::sync::Arc;

/// Shared state for settings handlers
#[derive(Clone)]
pub struct SettingsState {
    pub settings: Arc<SettingsStore>,
    pub workspace: Arc<Workspace>,
    pub provider: Arc<dyn InsightProvider>,
}

/// Create the settings router
pub fn settings_router(state: SettingsState) -> Router {
    Router::new()
        .route("/api/v1/settings", get(get_settings))
        .route("/api/v1/settings", patch(update_settings))
        .route("/api/v1/settings/validate-key", post(validate_key))
        .with_state(state)
}

/// GET /api/v1/settings
async fn get_settings(State(state): State<SettingsState>) -> impl IntoResponse {
    Json(build_response(&state).await)
}

/// PATCH /api/v1/settings
///
/// A changed locale or credential invalidates the cached daily focus so the
/// next read recomputes it.
async fn update_settings(
    State(state): State<SettingsState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> impl IntoResponse {
    match state
        .settings
        .update(request.locale, request.api_key)
        .await
    {
        Ok(_) => {
            state.workspace.invalidate_focus().await;
            (StatusCode::OK, Json(build_response(&state).await)).into_response()
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": {"code": "STORAGE", "message": e.to_string()}
            })),
        )
            .into_response(),
    }
}

/// POST /api/v1/settings/validate-key
///
/// Always 200 with a boolean; an invalid key is a result, not an error.
async fn validate_key(
    State(state): State<SettingsState>,
    Json(request): Json<ValidateKeyRequest>,
) -> impl IntoResponse {
    let valid = state.provider.validate_credentials(&request.api_key).await;
    Json(ValidateKeyResponse { valid })
}

async fn build_response(state: &SettingsState) -> SettingsResponse {
    let settings = state.settings.snapshot().await;
    SettingsResponse {
        locale: settings.locale,
        api_key: mask_api_key(settings.api_key.as_deref().unwrap_or("")),
        key_source: state.settings.key_source().await.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Locale;
    use crate::entry::Insight;
    use crate::insight::testing::StaticProvider;
    use crate::service::EntryService;
    use crate::store::JournalStore;
    use axum::body::Body;
    use std::sync::atomic::Ordering;
    use axum::http::Request;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn make_state(
        dir: &TempDir,
        provider: StaticProvider,
    ) -> (SettingsState, Arc<StaticProvider>) {
        let store = Arc::new(JournalStore::open(dir.path().join("entries.json")).unwrap());
        let provider: Arc<StaticProvider> = Arc::new(provider);
        let settings = Arc::new(SettingsStore::load(dir.path(), Some("shared".to_string())));
        let service = Arc::new(EntryService::new(
            store,
            provider.clone(),
            settings.clone(),
        ));
        let state = SettingsState {
            settings,
            workspace: Arc::new(Workspace::new(service)),
            provider: provider.clone(),
        };
        (state, provider)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 1024 * 64)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_get_settings_defaults() {
        let dir = TempDir::new().unwrap();
        let (state, _) = make_state(&dir, StaticProvider::returning(Insight::default()));
        let app = settings_router(state);

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/settings")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["locale"], "fr");
        assert_eq!(json["apiKey"], "");
        assert_eq!(json["keySource"], "shared");
    }

    #[tokio::test]
    async fn test_update_locale() {
        let dir = TempDir::new().unwrap();
        let (state, _) = make_state(&dir, StaticProvider::returning(Insight::default()));
        let app = settings_router(state);

        let resp = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/v1/settings")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"locale":"en"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["locale"], "en");
    }

    #[tokio::test]
    async fn test_update_api_key_is_masked_in_response() {
        let dir = TempDir::new().unwrap();
        let (state, _) = make_state(&dir, StaticProvider::returning(Insight::default()));
        let app = settings_router(state.clone());

        let resp = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/v1/settings")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"apiKey":"AIzaSyAbcdef1234567890"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        let json = body_json(resp).await;
        let key = json["apiKey"].as_str().unwrap();
        assert!(key.contains("****"));
        assert!(!key.contains("cdef123456"));
        assert_eq!(json["keySource"], "personal");

        // Raw key still served to the provider
        assert_eq!(
            state.settings.effective_key().await,
            "AIzaSyAbcdef1234567890"
        );
    }

    #[tokio::test]
    async fn test_update_invalidates_focus() {
        let dir = TempDir::new().unwrap();
        let (state, provider) = make_state(&dir, StaticProvider::returning(Insight::default()));

        state
            .workspace
            .record("a", "thought", Insight::default())
            .await
            .unwrap();
        state.workspace.daily_focus().await;

        let app = settings_router(state.clone());
        app.oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/v1/settings")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"locale":"en"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

        // Focus recomputes after the settings change
        state.workspace.daily_focus().await;
        assert_eq!(provider.focus_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_validate_key_valid() {
        let dir = TempDir::new().unwrap();
        let (state, _) = make_state(&dir, StaticProvider::returning(Insight::default()));
        let app = settings_router(state);

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/settings/validate-key")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"apiKey":"candidate"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["valid"], true);
    }

    #[tokio::test]
    async fn test_validate_key_invalid_is_false_not_error() {
        let dir = TempDir::new().unwrap();
        let (state, _) = make_state(&dir, StaticProvider::failing());
        let app = settings_router(state);

        let resp = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/settings/validate-key")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"apiKey":"bad"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let json = body_json(resp).await;
        assert_eq!(json["valid"], false);
    }

    #[tokio::test]
    async fn test_settings_persist_across_reload() {
        let dir = TempDir::new().unwrap();
        {
            let (state, _) = make_state(&dir, StaticProvider::returning(Insight::default()));
            let app = settings_router(state);
            app.oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/v1/settings")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"locale":"en","apiKey":"AIzaSyPersisted9999"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        }

        let store = SettingsStore::load(dir.path(), None);
        let settings = store.snapshot().await;
        assert_eq!(settings.locale, Locale::En);
        assert_eq!(settings.api_key.as_deref(), Some("AIzaSyPersisted9999"));
    }
}
