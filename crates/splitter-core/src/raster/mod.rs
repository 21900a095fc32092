//! Page rasterization.

mod pdftoppm;

pub use pdftoppm::PdftoppmRasterizer;

use std::path::Path;

use image::DynamicImage;

use crate::error::RenderError;

/// Result type for rasterization.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Renders PDF pages to pixel images.
pub trait Rasterizer: Send + Sync {
    /// Render every page, in page order.
    fn render(&self, pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>>;

    /// Render only the first page.
    fn render_first_page(&self, pdf: &Path, dpi: u32) -> Result<DynamicImage>;
}

/// One rendered page awaiting classification.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Page index (0-based).
    pub index: u32,
    /// Rendered pixels.
    pub image: DynamicImage,
    /// Page size in PDF points, used to map template boxes onto pixels.
    pub page_size: (f32, f32),
}

impl PageImage {
    pub fn new(index: u32, image: DynamicImage, page_size: (f32, f32)) -> Self {
        Self {
            index,
            image,
            page_size,
        }
    }

    /// Pixel dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}
