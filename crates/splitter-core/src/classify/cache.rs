//! Template image library and the read-mostly caches owned by the pipeline.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, info, trace, warn};

use crate::error::{Result, SplitterError};
use crate::pdf::PdfDocument;
use crate::raster::Rasterizer;

/// Candidate images per template at their native resolution.
#[derive(Debug, Clone, Default)]
pub struct TemplateLibrary {
    images: HashMap<String, Vec<DynamicImage>>,
}

impl TemplateLibrary {
    /// Empty library; logo templates never match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate image for `template`.
    pub fn with_image(mut self, template: impl Into<String>, image: DynamicImage) -> Self {
        self.images.entry(template.into()).or_default().push(image);
        self
    }

    /// Load candidate images from disk.
    ///
    /// PDFs contribute their first page rendered at `dpi`; other files are
    /// decoded as raster images. Missing files are skipped with a warning.
    pub fn load(
        assets: &BTreeMap<String, Vec<PathBuf>>,
        rasterizer: &dyn Rasterizer,
        dpi: u32,
    ) -> Result<Self> {
        let mut library = Self::new();

        for (template, paths) in assets {
            for path in paths {
                if !path.is_file() {
                    warn!("Template image for {} not found: {}", template, path.display());
                    continue;
                }
                let image = load_template_image(path, rasterizer, dpi)?;
                debug!(
                    "Loaded {} template {} ({}x{})",
                    template,
                    path.display(),
                    image.width(),
                    image.height()
                );
                library = library.with_image(template.clone(), image);
            }
        }

        info!("Loaded template images for {} templates", library.images.len());
        Ok(library)
    }

    /// Number of templates with at least one image.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn resized(&self, width: u32, height: u32) -> TemplateImages {
        let images = self
            .images
            .iter()
            .map(|(name, candidates)| {
                let resized = candidates
                    .iter()
                    .map(|img| img.resize_exact(width, height, FilterType::Triangle))
                    .collect();
                (name.clone(), resized)
            })
            .collect();
        TemplateImages { images }
    }
}

fn load_template_image(path: &Path, rasterizer: &dyn Rasterizer, dpi: u32) -> Result<DynamicImage> {
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        Ok(rasterizer.render_first_page(path, dpi)?)
    } else {
        Ok(image::open(path)?)
    }
}

/// Candidate images resized to one page size.
#[derive(Debug, Clone, Default)]
pub struct TemplateImages {
    images: HashMap<String, Vec<DynamicImage>>,
}

impl TemplateImages {
    /// Candidates for `template`, empty when none were configured.
    pub fn candidates(&self, template: &str) -> &[DynamicImage] {
        self.images.get(template).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Resized template sets keyed by page pixel dimensions.
///
/// A miss resizes outside the lock; concurrent misses for the same size may
/// both resize, and the first insert wins.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<(u32, u32), Arc<TemplateImages>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Templates resized to `width` x `height`.
    pub fn get_or_resize(
        &self,
        library: &TemplateLibrary,
        width: u32,
        height: u32,
    ) -> Arc<TemplateImages> {
        let key = (width, height);
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(hit);
        }

        debug!("Resizing templates to {}x{}", width, height);
        let resized = Arc::new(library.resized(width, height));

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key).or_insert(resized))
    }

    /// Number of cached sizes.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Paths whose geometry is kept by default.
const GEOMETRY_CAPACITY: usize = 256;

/// Page sizes in points, keyed by PDF path.
///
/// Holds at most `capacity` paths; the oldest entry is dropped first.
#[derive(Debug)]
pub struct GeometryCache {
    entries: RwLock<GeometryEntries>,
    capacity: usize,
}

#[derive(Debug, Default)]
struct GeometryEntries {
    sizes: HashMap<PathBuf, Arc<Vec<(f32, f32)>>>,
    order: VecDeque<PathBuf>,
}

impl Default for GeometryCache {
    fn default() -> Self {
        Self::with_capacity(GEOMETRY_CAPACITY)
    }
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` (at least one) paths.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(GeometryEntries::default()),
            capacity: capacity.max(1),
        }
    }

    /// Sizes of every page of `pdf`, in page order.
    pub fn page_sizes(&self, pdf: &Path) -> Result<Arc<Vec<(f32, f32)>>> {
        if let Some(hit) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sizes
            .get(pdf)
        {
            return Ok(Arc::clone(hit));
        }

        let document = PdfDocument::open(pdf)?;
        let sizes = (1..=document.page_count())
            .map(|page| document.page_size(page))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(SplitterError::from)?;
        debug!("Read geometry of {} pages from {}", sizes.len(), pdf.display());

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(hit) = entries.sizes.get(pdf) {
            return Ok(Arc::clone(hit));
        }
        while entries.order.len() >= self.capacity {
            if let Some(oldest) = entries.order.pop_front() {
                trace!("Evicting geometry of {}", oldest.display());
                entries.sizes.remove(&oldest);
            }
        }
        let sizes = Arc::new(sizes);
        entries.order.push_back(pdf.to_path_buf());
        entries.sizes.insert(pdf.to_path_buf(), Arc::clone(&sizes));
        Ok(sizes)
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .sizes
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
