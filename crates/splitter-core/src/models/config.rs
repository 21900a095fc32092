//! Configuration structures for the splitting pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration for the splitter pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitterConfig {
    /// External tool locations.
    pub tools: ToolConfig,

    /// Rasterization settings.
    pub render: RenderConfig,

    /// Template image assets.
    pub templates: TemplateAssetConfig,

    /// Orchestration settings.
    pub pipeline: PipelineConfig,
}

/// Locations of the external rasterizer and OCR binaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// `pdftoppm` binary (poppler).
    pub pdftoppm: PathBuf,

    /// `tesseract` binary.
    pub tesseract: PathBuf,

    /// OCR language passed to tesseract.
    pub language: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            pdftoppm: PathBuf::from("pdftoppm"),
            tesseract: PathBuf::from("tesseract"),
            language: "eng".to_string(),
        }
    }
}

/// Rasterization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// DPI used when classifying pages. At 72 DPI one pixel is one PDF point,
    /// which is the unit of the template boxes.
    pub classification_dpi: u32,

    /// DPI used when OCRing the first page of a sub-document.
    pub metadata_dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            classification_dpi: 72,
            metadata_dpi: 300,
        }
    }
}

/// Candidate template images per template name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateAssetConfig {
    /// Directory holding the template files.
    pub dir: PathBuf,

    /// Template name -> file names (PDF or raster image) inside `dir`.
    pub assets: BTreeMap<String, Vec<String>>,
}

impl Default for TemplateAssetConfig {
    fn default() -> Self {
        let mut assets = BTreeMap::new();
        assets.insert("Cheque".to_string(), vec!["cheque1.pdf".to_string()]);
        Self {
            dir: PathBuf::from("templates"),
            assets,
        }
    }
}

impl TemplateAssetConfig {
    /// Full paths of the candidate images for every template.
    pub fn resolved(&self) -> BTreeMap<String, Vec<PathBuf>> {
        self.assets
            .iter()
            .map(|(name, files)| {
                let paths = files.iter().map(|f| self.dir.join(f)).collect();
                (name.clone(), paths)
            })
            .collect()
    }
}

/// Orchestration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Classification worker threads (0 = number of CPUs).
    pub workers: usize,

    /// Read the PDF text layer before falling back to OCR for metadata.
    pub prefer_embedded_text: bool,

    /// Root folder for staged uploads and produced batches.
    pub output_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            prefer_embedded_text: false,
            output_dir: PathBuf::from("uploads"),
        }
    }
}

impl PipelineConfig {
    /// Effective worker count.
    pub fn worker_count(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}

impl SplitterConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
