//! Page rasterization
//!
//! Renders PDF pages to grayscale PNG images for OCR.
//!
//! MuPDF's fz_context is not thread-safe, so every call opens a fresh
//! document from the shared bytes. Callers run these methods on blocking
//! threads; nothing here is async.

use std::io::Cursor;

use mupdf::{Colorspace, Document, Matrix};

/// PDF user space units per inch
const POINTS_PER_INCH: f32 = 72.0;

/// Rasterization error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to open document: {0}")]
    LoadError(String),

    #[error("Page {page} out of range (document has {total} pages)")]
    PageNotFound { page: usize, total: usize },

    #[error("Failed to render page: {0}")]
    RenderFailed(String),

    #[error("Image encoding error: {0}")]
    ImageError(String),
}

impl From<mupdf::Error> for RenderError {
    fn from(e: mupdf::Error) -> Self {
        RenderError::RenderFailed(e.to_string())
    }
}

/// Encoded page image handed to the OCR engine
#[derive(Debug, Clone)]
pub struct PageImage {
    /// PNG bytes
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Rasterizer trait
///
/// Deterministic for the same inputs. `page_index` is 0-based.
pub trait Rasterizer: Send + Sync {
    /// Number of pages in the document
    fn page_count(&self, document: &[u8]) -> Result<usize, RenderError>;

    /// Render one page at the given DPI
    fn render(&self, document: &[u8], page_index: usize, dpi: u32) -> Result<PageImage, RenderError>;
}

/// MuPDF-backed rasterizer
#[derive(Debug, Clone, Copy, Default)]
pub struct MuPdfRasterizer;

impl MuPdfRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn open(document: &[u8]) -> Result<Document, RenderError> {
        Document::from_bytes(document, "application/pdf")
            .map_err(|e| RenderError::LoadError(e.to_string()))
    }
}

impl Rasterizer for MuPdfRasterizer {
    fn page_count(&self, document: &[u8]) -> Result<usize, RenderError> {
        let doc = Self::open(document)?;
        let count = doc
            .page_count()
            .map_err(|e| RenderError::LoadError(e.to_string()))?;
        Ok(count.max(0) as usize)
    }

    fn render(&self, document: &[u8], page_index: usize, dpi: u32) -> Result<PageImage, RenderError> {
        let doc = Self::open(document)?;
        let total = doc
            .page_count()
            .map_err(|e| RenderError::LoadError(e.to_string()))?
            .max(0) as usize;
        if page_index >= total {
            return Err(RenderError::PageNotFound {
                page: page_index + 1,
                total,
            });
        }

        let page = doc.load_page(page_index as i32)?;

        let scale = dpi as f32 / POINTS_PER_INCH;
        let matrix = Matrix::new_scale(scale, scale);

        // Grayscale, no alpha: one sample per pixel
        let colorspace = Colorspace::device_gray();
        let pixmap = page.to_pixmap(&matrix, &colorspace, false, false)?;

        encode_gray_png(&pixmap)
    }
}

/// Encode a pixmap as an 8-bit grayscale PNG
fn encode_gray_png(pixmap: &mupdf::Pixmap) -> Result<PageImage, RenderError> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = (pixmap.n() as usize).max(1);

    let mut gray = Vec::with_capacity((width * height) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            gray.push(samples.get(offset).copied().unwrap_or(255));
        }
    }

    let img = image::GrayImage::from_raw(width, height, gray)
        .ok_or_else(|| RenderError::ImageError("Failed to create image buffer".to_string()))?;

    let mut data = Vec::new();
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut data), image::ImageFormat::Png)
        .map_err(|e| RenderError::ImageError(e.to_string()))?;

    Ok(PageImage {
        data,
        width,
        height,
    })
}
