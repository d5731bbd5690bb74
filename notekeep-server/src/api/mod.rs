//! HTTP API endpoints
//!
//! Thin plumbing over the store: request validation, routes, response
//! shaping. Store errors are normalized here so callers only ever see 404,
//! 400 or an opaque 500.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use notekeep_core::{Note, NoteDraft, NotePage, NotePatch, NoteStore, StoreError};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

/// Application state: one store backend
pub type AppState = Arc<dyn NoteStore>;

/// Create the API router, mounting the disk and in-memory backends
pub fn create_router(disk: AppState, mem: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .merge(backend_routes("/v1/notes/disk", disk))
        .merge(backend_routes("/v1/notes/mem", mem))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn backend_routes(prefix: &str, store: AppState) -> Router {
    Router::new()
        .route(prefix, post(create))
        .route(&format!("{}/flush", prefix), post(flush))
        .route(&format!("{}/list/:page", prefix), get(list))
        .route(
            &format!("{}/:id", prefix),
            get(get_note).patch(update).delete(delete_note),
        )
        .with_state(store)
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error normalized for the HTTP boundary
pub enum ApiError {
    Validation(String),
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Note not found".to_string())
            }
            ApiError::Store(err @ StoreError::CapacityExceeded { .. }) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            ApiError::Store(err) => {
                // Opaque to the caller; details go to the log only
                error!("store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    let max = notekeep_core::config::TITLE_MAX_LEN;
    if title.chars().count() > max {
        return Err(ApiError::Validation(format!(
            "title must be shorter than or equal to {} characters",
            max
        )));
    }
    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: notekeep_core::VERSION.to_string(),
    })
}

async fn list(
    State(store): State<AppState>,
    Path(page): Path<i64>,
) -> Result<Json<NotePage>, ApiError> {
    Ok(Json(store.list(page).await?))
}

async fn get_note(
    State(store): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Note>, ApiError> {
    Ok(Json(store.get(id).await?))
}

async fn create(
    State(store): State<AppState>,
    Json(draft): Json<NoteDraft>,
) -> Result<(StatusCode, Json<Note>), ApiError> {
    validate_title(&draft.title)?;
    let note = store.create(draft).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

async fn update(
    State(store): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<NotePatch>,
) -> Result<Json<Note>, ApiError> {
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    Ok(Json(store.update(id, patch).await?))
}

async fn delete_note(
    State(store): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, ApiError> {
    store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn flush(State(store): State<AppState>) -> Result<StatusCode, ApiError> {
    store.flush_all().await?;
    Ok(StatusCode::OK)
}
