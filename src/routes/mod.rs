//! HTTP routes
//!
//! Endpoints:
//! - GET /health - Liveness, OCR engine availability, cache stats
//! - POST /upload-chunk - Append one chunk of a document upload
//! - POST /upload-complete - Confirm a document upload is assembled
//! - POST /search - Search an uploaded document for a phrase
//! - POST /clear-cache - Drop all cached OCR data

pub mod form;
pub mod health;
pub mod search;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().upload.max_body_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/upload-chunk", post(upload::upload_chunk))
        .route("/upload-complete", post(upload::upload_complete))
        .route("/search", post(search::search))
        .route("/clear-cache", post(search::clear_cache))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
