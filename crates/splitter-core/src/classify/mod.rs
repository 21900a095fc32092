//! Page classification against the template table.

mod cache;
mod classifier;
mod pool;

pub use cache::{GeometryCache, TemplateCache, TemplateImages, TemplateLibrary};
pub use classifier::TemplateClassifier;
pub use pool::ClassificationPool;
