//! Configuration management for the OCR search server

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::search::{
    MatcherConfig, DEFAULT_DPI, DEFAULT_MAX_WORKERS, DEFAULT_MIN_CONFIDENCE,
    DEFAULT_PAGE_TIMEOUT_SECS,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub search: SearchConfig,
    pub ocr: OcrConfig,
    pub upload: UploadConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Per-word fuzzy match threshold (percent)
    pub fuzzy_threshold: f64,
    /// Context words on each side of a match
    pub context_words: usize,
    /// Match box padding in pixels
    pub match_padding: u32,
    /// Ceiling on concurrent page workers
    pub max_workers: usize,
    pub page_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Words at or below this confidence (percent) are dropped
    pub min_confidence: f64,
    pub dpi: u32,
    pub language: String,
    pub tesseract_path: String,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    /// Request body limit for upload and search requests
    pub max_body_bytes: usize,
}

impl SearchConfig {
    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            fuzzy_threshold: self.fuzzy_threshold,
            context_words: self.context_words,
            padding: self.match_padding,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let matcher = MatcherConfig::default();
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            search: SearchConfig {
                fuzzy_threshold: matcher.fuzzy_threshold,
                context_words: matcher.context_words,
                match_padding: matcher.padding,
                max_workers: DEFAULT_MAX_WORKERS,
                page_timeout_secs: DEFAULT_PAGE_TIMEOUT_SECS,
            },
            ocr: OcrConfig {
                min_confidence: DEFAULT_MIN_CONFIDENCE,
                dpi: DEFAULT_DPI,
                language: "eng".to_string(),
                tesseract_path: "tesseract".to_string(),
            },
            upload: UploadConfig {
                dir: PathBuf::from("tmp_uploads"),
                max_body_bytes: 16 * 1024 * 1024,
            },
        }
    }
}

/// Error for a variable that is set but unparseable
#[derive(Debug, thiserror::Error)]
#[error("Invalid value for {key}: {value:?}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl Config {
    /// Load from environment variables, falling back to defaults for unset ones
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Config::default();
        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: parse_env("SERVER_PORT", defaults.server.port)?,
            },
            search: SearchConfig {
                fuzzy_threshold: parse_env("FUZZY_THRESHOLD", defaults.search.fuzzy_threshold)?,
                context_words: parse_env("CONTEXT_WORDS", defaults.search.context_words)?,
                match_padding: parse_env("MATCH_PADDING", defaults.search.match_padding)?,
                max_workers: parse_env("MAX_WORKERS", defaults.search.max_workers)?,
                page_timeout_secs: parse_env("PAGE_TIMEOUT_SECS", defaults.search.page_timeout_secs)?,
            },
            ocr: OcrConfig {
                min_confidence: parse_env("MIN_CONFIDENCE", defaults.ocr.min_confidence)?,
                dpi: parse_env("OCR_DPI", defaults.ocr.dpi)?,
                language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
                tesseract_path: env::var("TESSERACT_PATH").unwrap_or(defaults.ocr.tesseract_path),
            },
            upload: UploadConfig {
                dir: env::var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload.dir),
                max_body_bytes: parse_env("MAX_BODY_BYTES", defaults.upload.max_body_bytes)?,
            },
        })
    }
}

fn parse_env<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError { key, value }),
        Err(_) => Ok(default),
    }
}
