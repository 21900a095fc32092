//! Fake collaborators and synthetic PDFs for pipeline tests.
//!
//! Each page of a synthetic PDF carries a code in its MediaBox width
//! (`500 + code`). The fake rasterizer paints the code into every pixel and
//! the fake OCR engine maps the code back to a scripted text, so crops and
//! whole pages of the same page read the same text.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use image::{DynamicImage, GrayImage, Luma};
use lopdf::{dictionary, Document, Object};
use splitter_core::classify::TemplateLibrary;
use splitter_core::error::{OcrError, RenderError};
use splitter_core::models::SplitterConfig;
use splitter_core::{OcrEngine, PdfDocument, Rasterizer, Splitter};

pub const ADVICE_A: u8 = 10;
pub const ADVICE_B: u8 = 11;
pub const CONTINUATION: u8 = 20;
pub const VOUCHER_ONLY: u8 = 30;

const BASE_WIDTH: f32 = 500.0;

/// Write a PDF with one page per code.
pub fn write_pdf(path: &Path, codes: &[u8]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = codes
        .iter()
        .map(|&code| {
            let width = BASE_WIDTH as i64 + code as i64;
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), 800.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => codes.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Page codes of a PDF written by [`write_pdf`].
pub fn read_codes(path: &Path) -> Vec<u8> {
    let pdf = PdfDocument::open(path).unwrap();
    (1..=pdf.page_count())
        .map(|page| page_code(pdf.page_size(page).unwrap()))
        .collect()
}

fn page_code((width, _): (f32, f32)) -> u8 {
    (width - BASE_WIDTH).round() as u8
}

/// Paints each page's code into a page-sized grayscale image.
pub struct CodeRasterizer;

impl CodeRasterizer {
    fn page_image(size: (f32, f32)) -> DynamicImage {
        let (width, height) = size;
        let image = GrayImage::from_pixel(width as u32, height as u32, Luma([page_code(size)]));
        DynamicImage::ImageLuma8(image)
    }
}

impl Rasterizer for CodeRasterizer {
    fn render(&self, pdf: &Path, _dpi: u32) -> Result<Vec<DynamicImage>, RenderError> {
        let document = PdfDocument::open(pdf)?;
        (1..=document.page_count())
            .map(|page| -> Result<DynamicImage, RenderError> {
                Ok(Self::page_image(document.page_size(page)?))
            })
            .collect()
    }

    fn render_first_page(&self, pdf: &Path, _dpi: u32) -> Result<DynamicImage, RenderError> {
        let document = PdfDocument::open(pdf)?;
        Ok(Self::page_image(document.page_size(1)?))
    }
}

/// Reads the scripted text of the code found in the image.
pub struct CodeOcr {
    texts: HashMap<u8, &'static str>,
}

impl CodeOcr {
    pub fn new() -> Self {
        let mut texts = HashMap::new();
        texts.insert(
            ADVICE_A,
            "INTERNAL BANK ADVICE\nDATE: 05/03/2024\nBANK NAME: Example\n\
             BRANCH NUMBER: 001\nACCOUNT NUMBER: 42\nVoucher 12 345678",
        );
        texts.insert(
            ADVICE_B,
            "INTERNAL BANK ADVICE\nDate 2024-04-01\nBANK NAME: Example\n\
             BRANCH NUMBER: 002\nACCOUNT NUMBER: 43\nVoucher 34/567890",
        );
        texts.insert(CONTINUATION, "Supporting documents, continued");
        texts.insert(VOUCHER_ONLY, "Voucher No 55 123456");
        Self { texts }
    }
}

impl OcrEngine for CodeOcr {
    fn recognize(&self, image: &DynamicImage, _lang: &str) -> Result<String, OcrError> {
        let code = image.to_luma8().get_pixel(0, 0)[0];
        Ok(self.texts.get(&code).copied().unwrap_or_default().to_string())
    }
}

/// Fails every recognition.
pub struct BrokenOcr;

impl OcrEngine for BrokenOcr {
    fn recognize(&self, _image: &DynamicImage, _lang: &str) -> Result<String, OcrError> {
        Err(OcrError::Recognition {
            tool: "tesseract".to_string(),
            stderr: "Error opening data file eng.traineddata".to_string(),
        })
    }
}

pub fn splitter_with(ocr: Arc<dyn OcrEngine>) -> Splitter {
    let mut config = SplitterConfig::default();
    config.pipeline.workers = 4;

    Splitter::builder()
        .with_config(config)
        .with_rasterizer(Arc::new(CodeRasterizer))
        .with_ocr(ocr)
        .with_library(TemplateLibrary::new())
        .build()
        .unwrap()
}

pub fn splitter() -> Splitter {
    splitter_with(Arc::new(CodeOcr::new()))
}
