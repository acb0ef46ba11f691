//! OCR Search Server Library
//!
//! Phrase search over scanned PDFs. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `search`: worker sizing, page fan-out, phrase matching, OCR cache
//! - `ocr`: OCR engine seam and the Tesseract implementation
//! - `pdf`: page rasterization via MuPDF
//! - `upload`: chunked upload reassembly
//! - `routes`: HTTP endpoints

pub mod config;
pub mod error;
pub mod ocr;
pub mod pdf;
pub mod routes;
pub mod search;
pub mod state;
pub mod upload;
