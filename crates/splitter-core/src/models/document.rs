//! Data passed between the pipeline stages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Classification of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Page index (0-based).
    pub page_index: u32,
    /// Matched template, if any.
    pub template: Option<String>,
}

impl ClassificationResult {
    pub fn new(page_index: u32, template: Option<String>) -> Self {
        Self {
            page_index,
            template,
        }
    }

    /// Whether this page starts a new document.
    pub fn is_boundary(&self) -> bool {
        self.template.is_some()
    }
}

/// Inclusive range of 0-based page indices forming one sub-document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Build a range, or `None` when `end < start` (zero pages).
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Number of pages in the range.
    pub fn len(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Ranges always hold at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// 1-based page numbers covered by the range, as lopdf numbers them.
    pub fn page_numbers(&self) -> impl Iterator<Item = u32> {
        (self.start + 1)..=(self.end + 1)
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start + 1, self.end + 1)
    }
}

/// Voucher number and canonical date recovered from a sub-document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoucherMetadata {
    /// `{prefix}_{suffix}`, e.g. `12_345678`.
    pub voucher_number: Option<String>,
    /// `YYYY-MM-DD`, or the lenient fallback form.
    pub date: Option<String>,
}

impl VoucherMetadata {
    /// Success file name; only when both fields were recovered.
    pub fn file_stem(&self) -> Option<String> {
        match (&self.voucher_number, &self.date) {
            (Some(voucher), Some(date)) => Some(format!("{}_{}", voucher, date)),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.file_stem().is_some()
    }
}

/// Where a sub-document ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

/// Final location of one sub-document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Source PDF the pages came from.
    pub source: PathBuf,
    /// Pages copied from the source, if produced by a split.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<PageRange>,
    /// Success or failure partition.
    pub outcome: Outcome,
    /// Final path on disk.
    pub path: PathBuf,
    /// Extracted metadata.
    pub metadata: VoucherMetadata,
}
