//! OCR result cache
//!
//! Session-scoped, in-memory store of extracted page words keyed by a
//! document fingerprint. Entries live until `clear()`; there is no eviction.
//!
//! The fingerprint is derived from the document name and byte size only, so
//! two different documents sharing both will collide and the second is
//! served the first one's words.
//!
//! There is no single-flight: two concurrent misses for the same key both
//! run OCR and the last `put` wins.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::ocr::PageWords;

/// Fingerprint for a document
pub fn cache_key(document_name: &str, byte_size: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}", document_name, byte_size).as_bytes());
    hex::encode(hasher.finalize())
}

/// Extracted words for every page of one document
#[derive(Debug)]
pub struct CacheEntry {
    pub key: String,
    /// Indexed by 0-based page; `None` where extraction failed
    pub pages: Vec<Option<PageWords>>,
    pub total_pages: usize,
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub cached_files: usize,
    pub total_cached_pages: usize,
}

/// Thread-safe OCR cache
#[derive(Clone, Default)]
pub struct OcrCache {
    entries: Arc<RwLock<HashMap<String, Arc<CacheEntry>>>>,
}

impl OcrCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a document's extracted pages
    pub fn get(&self, key: &str) -> Option<Arc<CacheEntry>> {
        let entry = self.entries.read().get(key).cloned();
        match &entry {
            Some(entry) => tracing::debug!(
                key = %short_key(key),
                total_pages = entry.total_pages,
                "OCR cache hit"
            ),
            None => tracing::debug!(key = %short_key(key), "OCR cache miss"),
        }
        entry
    }

    /// Store a document's extracted pages, replacing any previous entry
    pub fn put(
        &self,
        key: String,
        pages: Vec<Option<PageWords>>,
        total_pages: usize,
    ) -> Arc<CacheEntry> {
        let entry = Arc::new(CacheEntry {
            key: key.clone(),
            pages,
            total_pages,
        });

        self.entries.write().insert(key.clone(), entry.clone());

        tracing::info!(key = %short_key(&key), total_pages, "Cached OCR data");
        entry
    }

    /// Drop every entry, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut entries = self.entries.write();
        let count = entries.len();
        entries.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        CacheStats {
            cached_files: entries.len(),
            total_cached_pages: entries.values().map(|e| e.total_pages).sum(),
        }
    }
}

fn short_key(key: &str) -> &str {
    key.get(..8).unwrap_or(key)
}
