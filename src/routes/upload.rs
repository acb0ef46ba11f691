//! Upload Routes
//!
//! Chunked upload: the client posts chunks in order, then confirms.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

use super::form::FormFields;

#[derive(Debug, Serialize)]
pub struct ChunkUploadResponse {
    status: &'static str,
    index: usize,
    total: usize,
    received_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct UploadCompleteResponse {
    status: &'static str,
    #[serde(rename = "fileName")]
    file_name: String,
}

/// POST /upload-chunk
///
/// Multipart fields: `chunk`, `index`, `total`, `fileName`.
pub async fn upload_chunk(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ChunkUploadResponse>> {
    let form = FormFields::read(multipart).await?;

    let (Some(chunk), Some(index), Some(total), Some(file_name)) = (
        form.bytes("chunk"),
        form.text("index"),
        form.text("total"),
        form.text("fileName"),
    ) else {
        return Err(AppError::BadRequest(
            "Missing chunk, index, total, or fileName".to_string(),
        ));
    };

    let index: usize = index
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid index".to_string()))?;
    let total: usize = total
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid total".to_string()))?;

    let received_bytes = state
        .uploads()
        .append_chunk(&file_name, index, total, chunk)
        .await?;

    tracing::info!(
        file_name = %file_name,
        "Uploaded chunk {}/{}",
        index + 1,
        total
    );

    Ok(Json(ChunkUploadResponse {
        status: "ok",
        index,
        total,
        received_bytes,
    }))
}

/// POST /upload-complete
///
/// Multipart field: `fileName`.
pub async fn upload_complete(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadCompleteResponse>> {
    let form = FormFields::read(multipart).await?;
    let file_name = form.require_text("fileName")?;

    if !state.uploads().exists(&file_name).await? {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    tracing::info!(file_name = %file_name, "Upload complete");

    Ok(Json(UploadCompleteResponse {
        status: "ok",
        file_name,
    }))
}
