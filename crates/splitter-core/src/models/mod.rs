//! Data models and configuration.

pub mod config;
pub mod document;
pub mod template;

pub use config::SplitterConfig;
pub use document::{ClassificationResult, Outcome, OutputRecord, PageRange, VoucherMetadata};
pub use template::{KeywordRegion, Region, Strategy, TemplateDefinition, TEMPLATES};
