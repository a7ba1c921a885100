pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

/// Headroom on top of the file limit for multipart boundaries and text fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;
    Router::new()
        .route("/health", get(health::health_handler))
        // ATS analysis API
        .route(
            "/api/v1/ats/requirements",
            post(handlers::handle_requirements),
        )
        .route("/api/v1/ats/analyze", post(handlers::handle_analyze))
        .route(
            "/api/v1/ats/analyze/upload",
            post(handlers::handle_analyze_upload),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
