//! Error types for the splitter-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the splitter library.
#[derive(Error, Debug)]
pub enum SplitterError {
    /// PDF container error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Page rasterization error.
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An input file does not exist or is not a regular file.
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A batch call was made without any inputs.
    #[error("no input files given")]
    EmptyBatch,

    /// At least one input of a batch produced no output at all.
    #[error("{failed}/{total} inputs failed; first error: {first_error}")]
    Batch {
        failed: usize,
        total: usize,
        first_error: String,
    },
}

/// Errors related to the PDF container.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// The page tree carries no usable MediaBox.
    #[error("page {0} has no MediaBox")]
    MissingMediaBox(u32),

    /// Failed to serialize an assembled document.
    #[error("failed to save PDF: {0}")]
    Save(String),

    /// Failed to extract the embedded text layer.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// I/O error while reading or writing a PDF.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the external rasterizer.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The rasterizer binary could not be started.
    #[error("cannot run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The rasterizer exited unsuccessfully.
    #[error("{tool} failed on page {page}: {stderr}")]
    ToolFailed {
        tool: String,
        page: u32,
        stderr: String,
    },

    /// The rasterizer succeeded but produced no image.
    #[error("no image produced for page {0}")]
    MissingOutput(u32),

    /// Page count could not be determined.
    #[error(transparent)]
    Pdf(#[from] PdfError),

    /// Decoding the produced image failed.
    #[error("failed to decode rendered page: {0}")]
    Decode(#[from] image::ImageError),

    /// Temp file handling failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR binary could not be started.
    #[error("cannot run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The OCR engine exited unsuccessfully.
    #[error("{tool} failed: {stderr}")]
    Recognition { tool: String, stderr: String },

    /// Writing the crop for the OCR engine failed.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] image::ImageError),

    /// Temp file handling failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the splitter library.
pub type Result<T> = std::result::Result<T, SplitterError>;
