//! OCR Engines
//!
//! Defines the engine trait and the Tesseract implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;

use super::types::{ConfidenceScale, OcrError, RawWord};

/// Tesseract TSV row level for individual words
const TSV_WORD_LEVEL: &str = "5";

/// OCR engine trait
///
/// Takes an encoded page image and returns its words in emission order.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Scale of the confidences returned by `recognize_words`
    fn confidence_scale(&self) -> ConfidenceScale;

    /// Check if the engine can be used on this host
    async fn is_available(&self) -> bool;

    /// Recognize words with bounding boxes in a PNG-encoded image
    async fn recognize_words(&self, image_data: &[u8]) -> Result<Vec<RawWord>, OcrError>;
}

/// Tesseract OCR engine (local `tesseract` binary)
pub struct TesseractEngine {
    binary: String,
    language: String,
    scratch_dir: PathBuf,
}

impl TesseractEngine {
    pub fn new(binary: &str, language: &str) -> Self {
        Self {
            binary: binary.to_string(),
            language: language.to_string(),
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Directory for the per-page input images
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn confidence_scale(&self) -> ConfidenceScale {
        ConfidenceScale::Percent
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn recognize_words(&self, image_data: &[u8]) -> Result<Vec<RawWord>, OcrError> {
        // Removed on drop, including when a caller's timeout cancels us
        let input = tempfile::Builder::new()
            .prefix("ocr_input_")
            .suffix(".png")
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to create temp file: {}", e)))?;

        tokio::fs::write(input.path(), image_data)
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        let output = Command::new(&self.binary)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--oem")
            .arg("3")
            .arg("--psm")
            .arg("3")
            .arg("tsv")
            .kill_on_drop(true)
            .output()
            .await;

        drop(input);

        let output = output.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => OcrError::EngineNotAvailable(format!(
                "{} not found on PATH",
                self.binary
            )),
            _ => OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse Tesseract TSV output into word rows.
///
/// Columns: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. Only level-5 rows are words;
/// the text column can be missing on rows Tesseract left empty.
pub fn parse_tsv(tsv: &str) -> Result<Vec<RawWord>, OcrError> {
    let mut words = Vec::new();

    for (line_no, line) in tsv.lines().enumerate() {
        if line.is_empty() || line.starts_with("level") {
            continue;
        }

        let columns: Vec<&str> = line.splitn(12, '\t').collect();
        if columns.len() < 11 {
            return Err(OcrError::ParseError(format!(
                "line {}: expected at least 11 columns, found {}",
                line_no + 1,
                columns.len()
            )));
        }
        if columns[0] != TSV_WORD_LEVEL {
            continue;
        }

        let number = |index: usize| -> Result<f64, OcrError> {
            columns[index].trim().parse::<f64>().map_err(|e| {
                OcrError::ParseError(format!("line {}: column {}: {}", line_no + 1, index + 1, e))
            })
        };

        words.push(RawWord {
            text: columns.get(11).copied().unwrap_or("").to_string(),
            left: number(6)?.max(0.0) as u32,
            top: number(7)?.max(0.0) as u32,
            width: number(8)?.max(0.0) as u32,
            height: number(9)?.max(0.0) as u32,
            confidence: number(10)?,
        });
    }

    Ok(words)
}
