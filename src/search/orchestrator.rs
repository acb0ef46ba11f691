//! Search orchestration
//!
//! ```text
//! search(document, name, query)
//!   │
//!   ├─ cache hit ──────────────────────────────┐
//!   │                                          │
//!   └─ cache miss                              │
//!        page_count → optimal_workers          │
//!        ┌──────── Semaphore(workers) ───────┐ │
//!        │ page 1   page 2   ...   page N    │ │
//!        └───────── JoinSet (barrier) ───────┘ │
//!        slots[page] = words | None            │
//!        cache.put                             │
//!                                              ▼
//!                           PhraseMatcher per page → SearchReport
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;

use crate::ocr::PageWords;

use super::cache::{cache_key, OcrCache};
use super::error::{PageExtractionError, Result, SearchError};
use super::extractor::PageWordExtractor;
use super::matcher::PhraseMatcher;
use super::types::{PageMatches, PhaseTimings, SearchReport};
use super::workers::{optimal_workers, HostResources, DEFAULT_MAX_WORKERS};

/// Default per-page extraction timeout
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 120;

/// Pages of a document as produced by one OCR pass
struct ExtractedPages {
    pages: Vec<Option<PageWords>>,
    workers: usize,
}

/// Entry point for phrase search over scanned documents
#[derive(Clone)]
pub struct SearchOrchestrator {
    extractor: Arc<PageWordExtractor>,
    matcher: PhraseMatcher,
    cache: OcrCache,
    host: HostResources,
    max_workers: usize,
    page_timeout: Duration,
}

impl SearchOrchestrator {
    pub fn new(extractor: PageWordExtractor, matcher: PhraseMatcher, cache: OcrCache) -> Self {
        Self {
            extractor: Arc::new(extractor),
            matcher,
            cache,
            host: HostResources::detect(),
            max_workers: DEFAULT_MAX_WORKERS,
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT_SECS),
        }
    }

    /// Override detected host resources
    pub fn with_host(mut self, host: HostResources) -> Self {
        self.host = host;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    pub fn cache(&self) -> &OcrCache {
        &self.cache
    }

    pub fn extractor(&self) -> &PageWordExtractor {
        &self.extractor
    }

    /// Search a document for a phrase.
    ///
    /// A blank query is valid and yields an empty report. Individual page
    /// failures are logged and skipped; only invalid input or an unreadable
    /// document fail the call.
    pub async fn search(
        &self,
        document: Vec<u8>,
        document_name: &str,
        query: &str,
    ) -> Result<SearchReport> {
        if document.is_empty() {
            return Err(SearchError::InvalidInput("document is empty".to_string()));
        }
        if document_name.trim().is_empty() {
            return Err(SearchError::InvalidInput("document name is required".to_string()));
        }

        let start = Instant::now();
        let key = cache_key(document_name, document.len());

        let (entry, from_cache, workers, ocr_time) = match self.cache.get(&key) {
            Some(entry) => {
                tracing::info!(
                    document = %document_name,
                    total_pages = entry.total_pages,
                    "Using cached OCR data"
                );
                (entry, true, 0, Duration::ZERO)
            }
            None => {
                tracing::info!(document = %document_name, "Performing OCR (not cached)");
                let ocr_start = Instant::now();
                let extracted = self.extract_all(Arc::new(document)).await?;
                let total_pages = extracted.pages.len();
                let entry = self.cache.put(key, extracted.pages, total_pages);
                let ocr_time = ocr_start.elapsed();
                tracing::info!(
                    total_pages,
                    workers = extracted.workers,
                    elapsed_ms = ocr_time.as_millis() as u64,
                    "OCR completed"
                );
                (entry, false, extracted.workers, ocr_time)
            }
        };

        let search_start = Instant::now();
        let mut matches = Vec::new();
        let mut failed_pages = Vec::new();

        // Pages are visited in index order, so the report is ascending by page
        for (index, page) in entry.pages.iter().enumerate() {
            let page_number = index + 1;
            let Some(words) = page else {
                failed_pages.push(page_number);
                continue;
            };

            let locations = self.matcher.find_matches(words, query, page_number);
            if !locations.is_empty() {
                tracing::debug!(page = page_number, count = locations.len(), "Found matches");
                matches.push(PageMatches {
                    page: page_number,
                    occurrences: locations.len(),
                    locations,
                });
            }
        }
        let search_time = search_start.elapsed();

        let total_matches = matches.iter().map(|p| p.occurrences).sum();
        let report = SearchReport {
            success: true,
            search_query: query.to_string(),
            total_matches,
            total_pages: entry.total_pages,
            pages_with_matches: matches.len(),
            failed_pages,
            from_cache,
            workers,
            timings: PhaseTimings::new(ocr_time, search_time, start.elapsed()),
            matches,
        };

        tracing::info!(
            total_matches = report.total_matches,
            pages_with_matches = report.pages_with_matches,
            from_cache,
            total_ms = start.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(report)
    }

    /// Fan out one extraction task per page and collect into page slots
    async fn extract_all(&self, document: Arc<Vec<u8>>) -> Result<ExtractedPages> {
        let total_pages = self
            .extractor
            .page_count(document.clone())
            .await
            .map_err(|e| SearchError::Document(e.to_string()))?;

        let workers = optimal_workers(total_pages, self.host, self.max_workers);
        tracing::info!(workers, total_pages, "Dispatching OCR workers");

        let permits = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();

        for page_index in 0..total_pages {
            let permits = permits.clone();
            let extractor = self.extractor.clone();
            let document = document.clone();
            let page_timeout = self.page_timeout;

            tasks.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        match timeout(page_timeout, extractor.extract_page(document, page_index)).await {
                            Ok(result) => result,
                            Err(_) => Err(PageExtractionError::Timeout(page_timeout.as_secs())),
                        }
                    }
                    Err(e) => Err(PageExtractionError::Join(e.to_string())),
                };
                (page_index, result)
            });
        }

        // Completion order is arbitrary; results land in their page's slot
        let mut pages: Vec<Option<PageWords>> = vec![None; total_pages];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((page_index, Ok(words))) => {
                    pages[page_index] = Some(words);
                }
                Ok((page_index, Err(e))) => {
                    tracing::warn!(page = page_index + 1, error = %e, "Page extraction failed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Page extraction task aborted");
                }
            }
        }

        Ok(ExtractedPages { pages, workers })
    }
}
