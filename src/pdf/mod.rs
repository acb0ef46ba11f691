//! PDF page rendering for OCR

mod rasterizer;

pub use rasterizer::{MuPdfRasterizer, PageImage, Rasterizer, RenderError};
