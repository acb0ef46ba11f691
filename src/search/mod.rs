//! Phrase search over OCR'd documents
//!
//! - `workers`: worker pool sizing from host resources
//! - `extractor`: rasterize + OCR one page into words
//! - `matcher`: sliding-window fuzzy phrase matching
//! - `cache`: fingerprint-keyed store of extracted pages
//! - `orchestrator`: fan-out/fan-in over pages and report aggregation

mod cache;
mod error;
mod extractor;
mod matcher;
mod orchestrator;
mod types;
mod workers;

pub use cache::{cache_key, CacheEntry, CacheStats, OcrCache};
pub use error::{PageExtractionError, SearchError};
pub use extractor::{PageWordExtractor, DEFAULT_DPI, DEFAULT_MIN_CONFIDENCE};
pub use matcher::{similarity, MatcherConfig, PhraseMatcher};
pub use orchestrator::{SearchOrchestrator, DEFAULT_PAGE_TIMEOUT_SECS};
pub use types::{ConfidenceLabel, Match, PageMatches, PhaseTimings, SearchReport};
pub use workers::{optimal_workers, HostResources, DEFAULT_MAX_WORKERS};
