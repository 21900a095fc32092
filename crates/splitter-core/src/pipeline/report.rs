//! Results returned by the pipeline entry points.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SplitterError;
use crate::models::{Outcome, OutputRecord, PageRange};

/// One input of a batch split: a PDF and its 1-based split numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRequest {
    pub pdf_path: PathBuf,
    #[serde(default)]
    pub split_numbers: Vec<u32>,
}

impl SplitRequest {
    pub fn new(pdf_path: impl Into<PathBuf>, split_numbers: Vec<u32>) -> Self {
        Self {
            pdf_path: pdf_path.into(),
            split_numbers,
        }
    }
}

/// An input that produced no output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFailure {
    pub source: PathBuf,
    pub error: String,
}

/// Outcome of a split-and-rename or rename-folder call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameReport {
    /// Timestamp folder holding both partitions.
    pub folder: PathBuf,
    pub success_folder: PathBuf,
    pub failure_folder: PathBuf,
    /// Every sub-document, in page order.
    pub records: Vec<OutputRecord>,
    /// Files that could not be routed at all.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<InputFailure>,
}

impl RenameReport {
    pub fn successes(&self) -> impl Iterator<Item = &OutputRecord> {
        self.records.iter().filter(|r| r.outcome == Outcome::Success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &OutputRecord> {
        self.records.iter().filter(|r| r.outcome == Outcome::Failure)
    }
}

/// A sub-document written by a batch split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitOutput {
    pub source: PathBuf,
    pub range: PageRange,
    pub path: PathBuf,
}

/// Outcome of a batch split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Timestamp folder shared by every input.
    pub folder: PathBuf,
    pub total_inputs: usize,
    pub outputs: Vec<SplitOutput>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<InputFailure>,
}

impl BatchReport {
    pub fn new(folder: PathBuf, total_inputs: usize) -> Self {
        Self {
            folder,
            total_inputs,
            outputs: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Paths of every produced sub-document.
    pub fn paths(&self) -> Vec<&Path> {
        self.outputs.iter().map(|o| o.path.as_path()).collect()
    }

    /// Aggregated error when at least one input produced nothing.
    pub fn error(&self) -> Option<SplitterError> {
        let first = self.failures.first()?;
        Some(SplitterError::Batch {
            failed: self.failures.len(),
            total: self.total_inputs,
            first_error: format!("{}: {}", first.source.display(), first.error),
        })
    }
}
