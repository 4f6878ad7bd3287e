pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::upload::handlers;

/// Headroom above the file limit for the text fields and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/upload", post(handlers::handle_upload))
        .route("/resume/:id", get(handlers::handle_get_resume))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
