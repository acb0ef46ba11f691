//! Health check

use axum::{extract::State, Json};
use serde::Serialize;

use crate::search::CacheStats;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    tesseract_available: bool,
    cache: CacheStats,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        tesseract_available: state.ocr_engine().is_available().await,
        cache: state.cache().stats(),
    })
}
