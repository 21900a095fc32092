//! Rasterizer wrapping the poppler `pdftoppm` CLI tool.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;
use tracing::{debug, trace};

use super::{Rasterizer, Result};
use crate::error::RenderError;
use crate::pdf::PdfDocument;

/// Renders pages by running `pdftoppm` once per page.
#[derive(Debug, Clone)]
pub struct PdftoppmRasterizer {
    binary: PathBuf,
}

impl PdftoppmRasterizer {
    /// Use the `pdftoppm` binary at `binary`.
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn tool_name(&self) -> String {
        self.binary.display().to_string()
    }

    fn render_page(
        &self,
        pdf: &Path,
        page: u32,
        dpi: u32,
        workdir: &Path,
    ) -> Result<DynamicImage> {
        let prefix = workdir.join(format!("page-{}", page));
        let png_path = prefix.with_extension("png");

        let output = Command::new(&self.binary)
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg("-singlefile")
            .arg("-png")
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|source| RenderError::Spawn {
                tool: self.tool_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(RenderError::ToolFailed {
                tool: self.tool_name(),
                page,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !png_path.exists() {
            return Err(RenderError::MissingOutput(page));
        }

        let image = image::open(&png_path)?;
        trace!(
            "Rendered page {} at {} DPI: {}x{}",
            page,
            dpi,
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

impl Default for PdftoppmRasterizer {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl Rasterizer for PdftoppmRasterizer {
    fn render(&self, pdf: &Path, dpi: u32) -> Result<Vec<DynamicImage>> {
        let page_count = PdfDocument::open(pdf)?.page_count();
        let workdir = tempfile::TempDir::with_prefix("pdftoppm")?;

        let images = (1..=page_count)
            .map(|page| self.render_page(pdf, page, dpi, workdir.path()))
            .collect::<Result<Vec<_>>>()?;

        debug!("Rendered {} pages of {}", images.len(), pdf.display());
        Ok(images)
    }

    fn render_first_page(&self, pdf: &Path, dpi: u32) -> Result<DynamicImage> {
        let workdir = tempfile::TempDir::with_prefix("pdftoppm")?;
        self.render_page(pdf, 1, dpi, workdir.path())
    }
}
