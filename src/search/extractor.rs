//! Per-page word extraction: rasterize, OCR, normalize, filter.

use std::sync::Arc;

use crate::ocr::{OcrEngine, PageWords, RawWord, Word};
use crate::pdf::{Rasterizer, RenderError};

use super::error::PageExtractionError;

/// Default rasterization resolution
pub const DEFAULT_DPI: u32 = 300;
/// Default minimum word confidence (percent, exclusive)
pub const DEFAULT_MIN_CONFIDENCE: f64 = 15.0;

/// Turns one page of a document into its filtered word sequence
pub struct PageWordExtractor {
    rasterizer: Arc<dyn Rasterizer>,
    engine: Arc<dyn OcrEngine>,
    dpi: u32,
    min_confidence: f64,
}

impl PageWordExtractor {
    pub fn new(rasterizer: Arc<dyn Rasterizer>, engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            rasterizer,
            engine,
            dpi: DEFAULT_DPI,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn engine(&self) -> &Arc<dyn OcrEngine> {
        &self.engine
    }

    /// Count pages on a blocking thread
    pub async fn page_count(&self, document: Arc<Vec<u8>>) -> Result<usize, RenderError> {
        let rasterizer = self.rasterizer.clone();
        tokio::task::spawn_blocking(move || rasterizer.page_count(&document))
            .await
            .map_err(|e| RenderError::LoadError(format!("Task join error: {}", e)))?
    }

    /// Extract the words of one page (`page_index` is 0-based)
    pub async fn extract_page(
        &self,
        document: Arc<Vec<u8>>,
        page_index: usize,
    ) -> Result<PageWords, PageExtractionError> {
        let rasterizer = self.rasterizer.clone();
        let dpi = self.dpi;

        // Offload CPU-bound rendering to the blocking thread pool
        let image = tokio::task::spawn_blocking(move || rasterizer.render(&document, page_index, dpi))
            .await
            .map_err(|e| PageExtractionError::Join(e.to_string()))??;

        let raw = self.engine.recognize_words(&image.data).await?;
        let words = self.filter_words(raw);

        tracing::debug!(
            page = page_index + 1,
            words = words.len(),
            "OCR page completed"
        );

        Ok(words)
    }

    /// Normalize confidences to 0-100 and drop blank or low-confidence words
    fn filter_words(&self, raw: Vec<RawWord>) -> PageWords {
        let scale = self.engine.confidence_scale();
        raw.into_iter()
            .filter_map(|word| {
                let confidence = scale.to_percent(word.confidence);
                let text = word.text.trim();
                if text.is_empty() || confidence <= self.min_confidence {
                    return None;
                }
                Some(Word {
                    text: text.to_string(),
                    left: word.left,
                    top: word.top,
                    width: word.width,
                    height: word.height,
                    confidence,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{ConfidenceScale, OcrError};
    use crate::pdf::PageImage;
    use async_trait::async_trait;

    struct BlankRasterizer;

    impl Rasterizer for BlankRasterizer {
        fn page_count(&self, _document: &[u8]) -> Result<usize, RenderError> {
            Ok(1)
        }

        fn render(&self, _document: &[u8], page_index: usize, dpi: u32) -> Result<PageImage, RenderError> {
            if page_index > 0 {
                return Err(RenderError::PageNotFound { page: page_index + 1, total: 1 });
            }
            Ok(PageImage { data: vec![dpi as u8], width: 1, height: 1 })
        }
    }

    struct FixedEngine {
        scale: ConfidenceScale,
        words: Vec<RawWord>,
    }

    #[async_trait]
    impl OcrEngine for FixedEngine {
        fn confidence_scale(&self) -> ConfidenceScale {
            self.scale
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn recognize_words(&self, _image_data: &[u8]) -> Result<Vec<RawWord>, OcrError> {
            Ok(self.words.clone())
        }
    }

    fn raw(text: &str, confidence: f64) -> RawWord {
        RawWord { text: text.to_string(), left: 1, top: 2, width: 3, height: 4, confidence }
    }

    fn extractor(scale: ConfidenceScale, words: Vec<RawWord>) -> PageWordExtractor {
        PageWordExtractor::new(Arc::new(BlankRasterizer), Arc::new(FixedEngine { scale, words }))
    }

    #[tokio::test]
    async fn test_low_confidence_and_blank_words_dropped() {
        let extractor = extractor(
            ConfidenceScale::Percent,
            vec![raw("keep", 96.0), raw("noise", 15.0), raw("  ", 99.0), raw("", -1.0), raw(" padded ", 40.0)],
        );

        let words = extractor.extract_page(Arc::new(vec![]), 0).await.unwrap();
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["keep", "padded"]);
    }

    #[tokio::test]
    async fn test_unit_scale_normalized_before_threshold() {
        let extractor = extractor(
            ConfidenceScale::Unit,
            vec![raw("sure", 0.9), raw("unsure", 0.1)],
        );

        let words = extractor.extract_page(Arc::new(vec![]), 0).await.unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "sure");
        assert_eq!(words[0].confidence, 90.0);
    }

    #[tokio::test]
    async fn test_custom_threshold() {
        let extractor = extractor(ConfidenceScale::Percent, vec![raw("mid", 50.0)])
            .with_min_confidence(60.0);
        let words = extractor.extract_page(Arc::new(vec![]), 0).await.unwrap();
        assert!(words.is_empty());
    }

    #[tokio::test]
    async fn test_render_failure_is_page_error() {
        let extractor = extractor(ConfidenceScale::Percent, vec![]);
        let result = extractor.extract_page(Arc::new(vec![]), 3).await;
        assert!(matches!(result, Err(PageExtractionError::Render(_))));
    }

    #[tokio::test]
    async fn test_page_count_offloaded() {
        let extractor = extractor(ConfidenceScale::Percent, vec![]).with_dpi(150);
        assert_eq!(extractor.page_count(Arc::new(vec![])).await.unwrap(), 1);
    }
}
