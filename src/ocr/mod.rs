//! OCR Module
//!
//! Word-level OCR for rasterized PDF pages.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ocr_search_server::ocr::{OcrEngine, TesseractEngine};
//!
//! let engine = TesseractEngine::new("tesseract", "eng");
//! if engine.is_available().await {
//!     let words = engine.recognize_words(&png_bytes).await?;
//! }
//! ```

mod provider;
mod types;

pub use provider::{parse_tsv, OcrEngine, TesseractEngine};
pub use types::{ConfidenceScale, OcrError, PageWords, RawWord, Word};
