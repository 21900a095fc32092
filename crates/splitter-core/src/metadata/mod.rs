//! Voucher number and date recovery from sub-document text.

pub mod dates;
mod extractor;
pub mod patterns;
pub mod voucher;

pub use dates::{extract_date, normalize_date, parse_date, DateExtractor};
pub use extractor::MetadataExtractor;
pub use voucher::{extract_voucher_number, VoucherExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in reading order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value and where it came from.
#[derive(Debug, Clone)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence score (0.0 - 1.0).
    pub confidence: f32,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: f32, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
