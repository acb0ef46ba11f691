//! OCR Types
//!
//! Word-level OCR output for rasterized PDF pages.

use serde::{Deserialize, Serialize};

/// One recognized word, as stored in the page word sequence.
///
/// Coordinates are pixel offsets into the rasterized page image.
/// `confidence` is always on the 0-100 scale once a word reaches this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    pub confidence: f64,
}

impl Word {
    pub fn right(&self) -> u32 {
        self.left.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.top.saturating_add(self.height)
    }
}

/// Words for one page, in OCR emission order
pub type PageWords = Vec<Word>;

/// Word exactly as an engine reported it, before trimming and filtering
#[derive(Debug, Clone, PartialEq)]
pub struct RawWord {
    pub text: String,
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
    /// Engine-native confidence, see [`ConfidenceScale`]
    pub confidence: f64,
}

/// Scale an engine reports word confidence on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceScale {
    /// 0-100 (Tesseract)
    Percent,
    /// 0-1
    Unit,
}

impl ConfidenceScale {
    /// Convert an engine-native confidence to 0-100
    pub fn to_percent(self, confidence: f64) -> f64 {
        match self {
            Self::Percent => confidence,
            Self::Unit => confidence * 100.0,
        }
    }
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("Failed to parse OCR output: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_scale_normalizes_to_percent() {
        assert_eq!(ConfidenceScale::Unit.to_percent(0.5), 50.0);
        assert_eq!(ConfidenceScale::Percent.to_percent(42.0), 42.0);
    }

    #[test]
    fn test_word_edges() {
        let word = Word {
            text: "total".to_string(),
            left: 10,
            top: 20,
            width: 30,
            height: 5,
            confidence: 90.0,
        };
        assert_eq!(word.right(), 40);
        assert_eq!(word.bottom(), 25);
    }
}
