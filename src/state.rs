//! Application state management

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::pdf::{MuPdfRasterizer, Rasterizer};
use crate::search::{OcrCache, PageWordExtractor, PhraseMatcher, SearchOrchestrator};
use crate::upload::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    orchestrator: SearchOrchestrator,
    uploads: UploadStore,
}

impl AppState {
    /// Build state with MuPDF rendering and the Tesseract CLI
    pub fn new(config: Config) -> Self {
        let engine = TesseractEngine::new(&config.ocr.tesseract_path, &config.ocr.language);
        Self::with_backends(config, Arc::new(MuPdfRasterizer::new()), Arc::new(engine))
    }

    /// Build state with custom rasterizer and OCR engine
    pub fn with_backends(
        config: Config,
        rasterizer: Arc<dyn Rasterizer>,
        engine: Arc<dyn OcrEngine>,
    ) -> Self {
        let extractor = PageWordExtractor::new(rasterizer, engine)
            .with_dpi(config.ocr.dpi)
            .with_min_confidence(config.ocr.min_confidence);

        let orchestrator = SearchOrchestrator::new(
            extractor,
            PhraseMatcher::new(config.search.matcher_config()),
            OcrCache::new(),
        )
        .with_max_workers(config.search.max_workers)
        .with_page_timeout(Duration::from_secs(config.search.page_timeout_secs));

        let uploads = UploadStore::new(config.upload.dir.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
                uploads,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.inner.orchestrator
    }

    /// Get the OCR cache
    pub fn cache(&self) -> &OcrCache {
        self.inner.orchestrator.cache()
    }

    pub fn uploads(&self) -> &UploadStore {
        &self.inner.uploads
    }

    pub fn ocr_engine(&self) -> &Arc<dyn OcrEngine> {
        self.inner.orchestrator.extractor().engine()
    }
}
