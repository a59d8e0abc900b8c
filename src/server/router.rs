//! Router builder for the service routes

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::handlers::{get_orders, health, upload_file, AppState};

/// Build the application router
///
/// - POST /upload - ingest one legacy order file (multipart `file` field)
/// - GET /orders - query orders by id and/or inclusive date range
/// - GET /health - liveness probe
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_file))
        .route("/orders", get(get_orders))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
