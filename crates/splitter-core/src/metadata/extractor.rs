//! First-page text acquisition and metadata parsing.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{extract_date, extract_voucher_number};
use crate::error::Result;
use crate::models::VoucherMetadata;
use crate::ocr::RegionReader;
use crate::pdf::PdfDocument;
use crate::raster::Rasterizer;

/// Recovers voucher metadata from the first page of a sub-document.
#[derive(Clone)]
pub struct MetadataExtractor {
    rasterizer: Arc<dyn Rasterizer>,
    reader: RegionReader,
    dpi: u32,
    prefer_embedded_text: bool,
}

impl MetadataExtractor {
    /// OCR the first page rendered at `dpi`.
    pub fn new(rasterizer: Arc<dyn Rasterizer>, reader: RegionReader, dpi: u32) -> Self {
        Self {
            rasterizer,
            reader,
            dpi,
            prefer_embedded_text: false,
        }
    }

    /// Try the PDF text layer before OCR.
    pub fn with_embedded_text(mut self, prefer: bool) -> Self {
        self.prefer_embedded_text = prefer;
        self
    }

    /// Apply the voucher and date rules to already recognized text.
    pub fn parse_text(text: &str) -> VoucherMetadata {
        VoucherMetadata {
            voucher_number: extract_voucher_number(text),
            date: extract_date(text),
        }
    }

    /// Text of the first page of `pdf`.
    pub fn first_page_text(&self, pdf: &Path) -> Result<String> {
        if self.prefer_embedded_text {
            match PdfDocument::open(pdf).and_then(|doc| doc.first_page_text()) {
                Ok(text) if !text.trim().is_empty() => {
                    trace!("Using embedded text of {}", pdf.display());
                    return Ok(text);
                }
                Ok(_) => debug!("{} has no text layer, running OCR", pdf.display()),
                Err(e) => debug!("Text layer of {} unreadable ({}), running OCR", pdf.display(), e),
            }
        }

        let image = self.rasterizer.render_first_page(pdf, self.dpi)?;
        Ok(self.reader.read_image(&image)?)
    }

    /// Voucher number and date of the sub-document at `pdf`.
    pub fn extract_from_pdf(&self, pdf: &Path) -> Result<VoucherMetadata> {
        let text = self.first_page_text(pdf)?;
        let metadata = Self::parse_text(&text);
        debug!(
            "{}: voucher {:?}, date {:?}",
            pdf.display(),
            metadata.voucher_number,
            metadata.date
        );
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OcrError;
    use crate::ocr::OcrEngine;
    use crate::raster;
    use image::DynamicImage;
    use pretty_assertions::assert_eq;

    struct BlankRasterizer;

    impl Rasterizer for BlankRasterizer {
        fn render(&self, _pdf: &Path, _dpi: u32) -> raster::Result<Vec<DynamicImage>> {
            Ok(vec![DynamicImage::new_luma8(10, 10)])
        }

        fn render_first_page(&self, _pdf: &Path, _dpi: u32) -> raster::Result<DynamicImage> {
            Ok(DynamicImage::new_luma8(10, 10))
        }
    }

    struct FixedOcr(&'static str);

    impl OcrEngine for FixedOcr {
        fn recognize(&self, _image: &DynamicImage, _lang: &str) -> std::result::Result<String, OcrError> {
            Ok(self.0.to_string())
        }
    }

    fn extractor(text: &'static str) -> MetadataExtractor {
        MetadataExtractor::new(
            Arc::new(BlankRasterizer),
            RegionReader::new(Arc::new(FixedOcr(text)), "eng"),
            300,
        )
    }

    #[test]
    fn test_parse_text_both_fields() {
        let metadata = MetadataExtractor::parse_text("Voucher No 12 345678\nDate: 05/03/2024");
        assert_eq!(metadata.voucher_number.as_deref(), Some("12_345678"));
        assert_eq!(metadata.date.as_deref(), Some("2024-03-05"));
        assert_eq!(metadata.file_stem().as_deref(), Some("12_345678_2024-03-05"));
    }

    #[test]
    fn test_parse_text_voucher_only() {
        let metadata = MetadataExtractor::parse_text("Voucher No 12 345678");
        assert!(metadata.voucher_number.is_some());
        assert!(!metadata.is_complete());
    }

    #[test]
    fn test_extract_runs_ocr() {
        let metadata = extractor("  DATE 2024-03-05 ref 55-123456 \n")
            .extract_from_pdf(Path::new("unused.pdf"))
            .unwrap();
        assert_eq!(
            metadata,
            VoucherMetadata {
                voucher_number: Some("55_123456".to_string()),
                date: Some("2024-03-05".to_string()),
            }
        );
    }

    #[test]
    fn test_embedded_text_falls_back_to_ocr() {
        // The path does not exist, so the text layer is unreadable.
        let metadata = extractor("Date: 5 March 2024")
            .with_embedded_text(true)
            .extract_from_pdf(Path::new("/nonexistent/doc.pdf"))
            .unwrap();
        assert_eq!(metadata.date.as_deref(), Some("2024-03-05"));
        assert_eq!(metadata.voucher_number, None);
    }
}
