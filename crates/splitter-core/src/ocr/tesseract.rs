//! OCR engine wrapping the `tesseract` CLI tool.

use std::path::PathBuf;
use std::process::Command;

use image::DynamicImage;
use tracing::trace;

use super::{OcrEngine, Result};
use crate::error::OcrError;

/// Runs the configured `tesseract` binary on a temporary PNG.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
}

impl TesseractEngine {
    /// Use the `tesseract` binary at `binary`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &DynamicImage, lang: &str) -> Result<String> {
        if image.width() == 0 || image.height() == 0 {
            return Ok(String::new());
        }

        let tmpdir = tempfile::TempDir::with_prefix("tesseract")?;
        let input_path = tmpdir.path().join("input.png");
        image.save_with_format(&input_path, image::ImageFormat::Png)?;

        let output = Command::new(&self.binary)
            .arg(&input_path)
            .arg("stdout")
            .arg("-l")
            .arg(lang)
            .output()
            .map_err(|source| OcrError::Spawn {
                tool: self.binary.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Recognition {
                tool: self.binary.display().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).replace('\u{0000}', "");
        trace!(
            "tesseract read {} chars from {}x{} image",
            text.len(),
            image.width(),
            image.height()
        );
        Ok(text)
    }
}
