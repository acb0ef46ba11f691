//! Search error types
//!
//! Page-level failures are isolated: they are logged and the page yields no
//! matches. Only `SearchError` reaches the caller.

use thiserror::Error;

use crate::ocr::OcrError;
use crate::pdf::RenderError;

/// Failure extracting words from a single page
#[derive(Debug, Error)]
pub enum PageExtractionError {
    #[error("Rasterization failed: {0}")]
    Render(#[from] RenderError),

    #[error("OCR failed: {0}")]
    Ocr(#[from] OcrError),

    #[error("Page extraction timed out after {0} seconds")]
    Timeout(u64),

    #[error("Task join error: {0}")]
    Join(String),
}

/// Request-level search failure
#[derive(Debug, Error)]
pub enum SearchError {
    /// Missing or unusable input, rejected before any processing
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The document could not be opened at all
    #[error("Failed to open document: {0}")]
    Document(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
