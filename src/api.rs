//! Unified API router for Lumina
//!
//! Merges the entries, focus, and settings routers into a single axum
//! `Router` with CORS and consistent error handling.
//!
//! ## Endpoint Map
//!
//! | Route                              | Description                         |
//! |------------------------------------|-------------------------------------|
//! | `GET    /health`                   | Health probe                        |
//! | `GET    /api/entries`              | All entries, newest first           |
//! | `POST   /api/entries`              | Capture a thought                   |
//! | `DELETE /api/entries/:id`          | Delete an entry (idempotent)        |
//! | `GET    /api/focus`                | Daily focus summary                 |
//! | `GET    /api/v1/settings`          | Current settings (key masked)       |
//! | `PATCH  /api/v1/settings`          | Update locale / personal key        |
//! | `POST   /api/v1/settings/validate-key` | Check a candidate key           |

use crate::entry::Insight;
use crate::error::Error;
use crate::settings::{settings_router, SettingsState};
use crate::workspace::Workspace;
use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Lumina HTTP application
pub fn build_app(workspace: Arc<Workspace>, settings_state: SettingsState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(entries_router(workspace))
        .merge(settings_router(settings_state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(cors_origins))
}

fn entries_router(workspace: Arc<Workspace>) -> Router {
    Router::new()
        .route("/api/entries", get(list_entries))
        .route("/api/entries", post(create_entry))
        .route("/api/entries/:id", delete(delete_entry))
        .route("/api/focus", get(get_focus))
        .with_state(workspace)
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/entries
async fn list_entries(State(workspace): State<Arc<Workspace>>) -> Response {
    match workspace.refresh().await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => error_response(&e),
    }
}

#[derive(Deserialize)]
struct CreateEntryRequest {
    content: String,
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
    /// Pre-classified metadata; when absent the server asks the provider
    metadata: Option<Insight>,
}

fn default_kind() -> String {
    "thought".to_string()
}

#[derive(Serialize)]
struct CreateEntryResponse {
    id: i64,
}

/// POST /api/entries
async fn create_entry(
    State(workspace): State<Arc<Workspace>>,
    Json(request): Json<CreateEntryRequest>,
) -> Response {
    let result = match request.metadata {
        Some(metadata) => {
            workspace
                .record(&request.content, &request.kind, metadata)
                .await
        }
        None => workspace.submit(&request.content, &request.kind).await,
    };

    match result {
        Ok(entry) => Json(CreateEntryResponse { id: entry.id }).into_response(),
        Err(e) => error_response(&e),
    }
}

#[derive(Serialize)]
struct DeleteEntryResponse {
    success: bool,
}

/// DELETE /api/entries/:id
///
/// Succeeds regardless of prior existence.
async fn delete_entry(
    State(workspace): State<Arc<Workspace>>,
    Path(id): Path<i64>,
) -> Response {
    match workspace.remove(id).await {
        Ok(()) => Json(DeleteEntryResponse { success: true }).into_response(),
        Err(e) => error_response(&e),
    }
}

#[derive(Serialize)]
struct FocusResponse {
    focus: String,
}

/// GET /api/focus
async fn get_focus(State(workspace): State<Arc<Workspace>>) -> Response {
    // The focus derives from the cached list; make sure it is populated
    if workspace.entries().await.is_empty() {
        if let Err(e) = workspace.refresh().await {
            return error_response(&e);
        }
    }
    let focus = workspace.daily_focus().await;
    Json(FocusResponse { focus }).into_response()
}

// =============================================================================
// Error mapping
// =============================================================================

fn error_response(error: &Error) -> Response {
    let (status, code) = match error {
        Error::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION"),
        Error::Insight(_) => (StatusCode::BAD_GATEWAY, "INSIGHT"),
        Error::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL"),
    };

    (
        status,
        Json(serde_json::json!({
            "error": {"code": code, "message": error.to_string()}
        })),
    )
        .into_response()
}

// =============================================================================
// CORS
// =============================================================================

fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        let parsed: Vec<_> = origins
            .iter()
            .filter_map(|o| o.parse::<header::HeaderValue>().ok())
            .collect();
        cors.allow_origin(parsed)
    }
}
