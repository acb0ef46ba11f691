//! Search API routes

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::search::SearchReport;
use crate::state::AppState;

use super::form::FormFields;

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    success: bool,
    cleared_files: usize,
    message: String,
}

/// POST /search
///
/// Multipart fields: `fileName` (a completed upload) and `search_text`.
pub async fn search(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SearchReport>> {
    let form = FormFields::read(multipart).await?;

    let (Some(file_name), Some(search_text)) = (form.text("fileName"), form.text("search_text"))
    else {
        return Err(AppError::BadRequest(
            "Missing fileName or search_text".to_string(),
        ));
    };

    if !state.uploads().exists(&file_name).await? {
        return Err(AppError::NotFound("File not found".to_string()));
    }
    let document = state.uploads().read(&file_name).await?;

    let report = state
        .orchestrator()
        .search(document, &file_name, &search_text)
        .await?;

    Ok(Json(report))
}

/// POST /clear-cache
pub async fn clear_cache(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    let count = state.cache().clear();
    tracing::info!(cleared_files = count, "Cleared OCR cache");

    Json(ClearCacheResponse {
        success: true,
        cleared_files: count,
        message: format!("Cache cleared ({} files removed)", count),
    })
}
