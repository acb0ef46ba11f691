//! Error types for the HTTP layer

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::search::SearchError;
use crate::upload::UploadError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Malformed form data: {0}")]
    Multipart(#[from] MultipartError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Search(SearchError::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, "invalid_input", msg.clone())
            }
            AppError::Search(e @ SearchError::Document(_)) => {
                tracing::error!("Search pipeline error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "document_error", e.to_string())
            }
            AppError::Upload(e) => {
                let status = e.status_code();
                if status.is_server_error() {
                    tracing::error!("Upload error: {}", e);
                }
                let code = match e {
                    UploadError::InvalidFileName(_) => "invalid_file_name",
                    UploadError::ChunkIndexOutOfBounds { .. } => "chunk_index_out_of_bounds",
                    UploadError::FileNotFound(_) => "not_found",
                    UploadError::StorageError(_) => "storage_error",
                };
                (status, code, e.to_string())
            }
            AppError::Multipart(e) => (StatusCode::BAD_REQUEST, "bad_request", e.body_text()),
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
            code,
        });

        (status, body).into_response()
    }
}
