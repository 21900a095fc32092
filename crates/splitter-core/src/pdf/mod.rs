//! PDF container access: page count, page geometry, and page-range copies.

mod document;

pub use document::PdfDocument;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;
