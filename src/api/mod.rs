//! API module
//!
//! Route registration and HTTP handlers for the file service.

pub mod files;
pub mod pages;

use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Health indicator
    pub status: String,
    /// Crate version
    pub version: String,
    /// Human-readable message
    pub message: String,
}

/// GET /api/health - Service liveness probe
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        message: "File service is healthy".to_string(),
    })
}

/// Build the service router over shared state.
///
/// Route registration is an explicit initialization step: embedders can mount
/// several routers with distinct storage roots in one process. Uploads have no
/// body-size cap, so the default axum limit is lifted here.
pub fn router(state: Arc<AppState>) -> Router {
    let assets_dir = state.template_dir.join("assets");
    Router::new()
        .route("/", get(pages::index))
        .route("/upload", post(files::upload_file))
        .route("/files", get(files::list_files))
        .route("/delete", post(files::delete_file))
        .route("/api/health", get(health_check))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .nest_service("/file", ServeDir::new(state.storage.root()))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
