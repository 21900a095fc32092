//! Cropping template boxes out of page images and reading their text.

use std::sync::Arc;

use image::DynamicImage;
use tracing::trace;

use super::{OcrEngine, Result};
use crate::models::Region;
use crate::raster::PageImage;

/// Crop `region` out of a page, clipped to the page bounds.
///
/// Returns `None` when the clipped box is empty.
pub fn crop_region(page: &PageImage, region: &Region) -> Option<DynamicImage> {
    let (width, height) = page.dimensions();
    let (x, y, w, h) = region.to_pixels(page.page_size, width, height)?;
    Some(page.image.crop_imm(x, y, w, h))
}

/// Reads the text inside template boxes.
#[derive(Clone)]
pub struct RegionReader {
    engine: Arc<dyn OcrEngine>,
    language: String,
}

impl RegionReader {
    pub fn new(engine: Arc<dyn OcrEngine>, language: impl Into<String>) -> Self {
        Self {
            engine,
            language: language.into(),
        }
    }

    /// OCR the text inside `region`; an empty crop reads as empty text.
    pub fn read(&self, page: &PageImage, region: &Region) -> Result<String> {
        let Some(crop) = crop_region(page, region) else {
            trace!("Page {}: region {:?} is empty after clipping", page.index, region);
            return Ok(String::new());
        };

        let text = self.engine.recognize(&crop, &self.language)?;
        Ok(text.trim().to_string())
    }

    /// OCR a whole image.
    pub fn read_image(&self, image: &DynamicImage) -> Result<String> {
        Ok(self.engine.recognize(image, &self.language)?.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEngine {
        calls: AtomicUsize,
    }

    impl OcrEngine for CountingEngine {
        fn recognize(&self, image: &DynamicImage, _lang: &str) -> std::result::Result<String, OcrError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("  {}x{}\n", image.width(), image.height()))
        }
    }

    fn page() -> PageImage {
        PageImage::new(0, DynamicImage::new_rgb8(595, 842), (595.0, 842.0))
    }

    #[test]
    fn test_read_clips_and_trims() {
        let engine = Arc::new(CountingEngine {
            calls: AtomicUsize::new(0),
        });
        let reader = RegionReader::new(engine.clone(), "eng");

        let text = reader.read(&page(), &Region::new(500, 800, 700, 900)).unwrap();
        assert_eq!(text, "95x42");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_crop_skips_engine() {
        let engine = Arc::new(CountingEngine {
            calls: AtomicUsize::new(0),
        });
        let reader = RegionReader::new(engine.clone(), "eng");

        let text = reader.read(&page(), &Region::new(600, 0, 700, 100)).unwrap();
        assert_eq!(text, "");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }
}
