//! OCR capability and region text extraction.

mod region;
mod tesseract;

pub use region::{crop_region, RegionReader};
pub use tesseract::TesseractEngine;

use image::DynamicImage;

use crate::error::OcrError;

/// Result type for OCR operations.
pub type Result<T> = std::result::Result<T, OcrError>;

/// Recognizes the text in an image.
pub trait OcrEngine: Send + Sync {
    /// Run recognition over the whole image in language `lang`.
    fn recognize(&self, image: &DynamicImage, lang: &str) -> Result<String>;
}

/// Case-insensitive substring count of `keywords` found in `text`.
pub fn count_keywords(text: &str, keywords: &[&str]) -> usize {
    let haystack = text.to_lowercase();
    keywords
        .iter()
        .filter(|keyword| haystack.contains(&keyword.to_lowercase()))
        .count()
}
