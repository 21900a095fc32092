//! Core library for splitting scanned voucher batches.
//!
//! This crate provides:
//! - Per-page classification against a compiled template table
//! - Segmentation of the classification stream into sub-document page ranges
//! - Voucher number and date extraction from each sub-document
//! - Routing of sub-documents into success and failure partitions

pub mod classify;
pub mod error;
pub mod matching;
pub mod metadata;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod raster;
pub mod segment;
pub mod storage;

pub use error::{Result, SplitterError};
pub use matching::{ImageMatcher, NccMatcher};
pub use models::{
    ClassificationResult, Outcome, OutputRecord, PageRange, SplitterConfig, VoucherMetadata,
};
pub use ocr::{OcrEngine, TesseractEngine};
pub use pdf::PdfDocument;
pub use pipeline::{
    BatchReport, InputFailure, RenameReport, SplitOutput, SplitRequest, Splitter, SplitterBuilder,
};
pub use raster::{PdftoppmRasterizer, Rasterizer};
pub use segment::{find_split_numbers, normalize_split_numbers, page_ranges};
