//! The splitting pipeline.
//!
//! A [`Splitter`] owns the collaborators and caches and exposes the three
//! produced operations: classify-and-split, split-and-rename and the batch
//! split-and-save, plus renaming already split documents, either a whole
//! folder of them or loose files.

mod report;

pub use report::{BatchReport, InputFailure, RenameReport, SplitOutput, SplitRequest};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::classify::{
    ClassificationPool, GeometryCache, TemplateCache, TemplateClassifier, TemplateLibrary,
};
use crate::error::{OcrError, Result, SplitterError};
use crate::matching::{ImageMatcher, NccMatcher};
use crate::metadata::MetadataExtractor;
use crate::models::{
    ClassificationResult, Outcome, OutputRecord, PageRange, SplitterConfig, VoucherMetadata,
};
use crate::ocr::{OcrEngine, RegionReader, TesseractEngine};
use crate::pdf::PdfDocument;
use crate::raster::{PageImage, PdftoppmRasterizer, Rasterizer};
use crate::segment::{find_split_numbers, page_ranges, segment};
use crate::storage;

/// Builder for [`Splitter`].
///
/// Collaborators that are not supplied are created from the configuration.
pub struct SplitterBuilder {
    config: SplitterConfig,
    rasterizer: Option<Arc<dyn Rasterizer>>,
    ocr: Option<Arc<dyn OcrEngine>>,
    matcher: Option<Arc<dyn ImageMatcher>>,
    library: Option<TemplateLibrary>,
}

impl SplitterBuilder {
    pub fn new() -> Self {
        Self {
            config: SplitterConfig::default(),
            rasterizer: None,
            ocr: None,
            matcher: None,
            library: None,
        }
    }

    pub fn with_config(mut self, config: SplitterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn with_ocr(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn ImageMatcher>) -> Self {
        self.matcher = Some(matcher);
        self
    }

    /// Use these template images instead of loading the configured assets.
    pub fn with_library(mut self, library: TemplateLibrary) -> Self {
        self.library = Some(library);
        self
    }

    pub fn build(self) -> Result<Splitter> {
        let config = self.config;

        let rasterizer = self.rasterizer.unwrap_or_else(|| {
            Arc::new(PdftoppmRasterizer::new(config.tools.pdftoppm.clone()))
        });
        let ocr = self
            .ocr
            .unwrap_or_else(|| Arc::new(TesseractEngine::new(config.tools.tesseract.clone())));
        let matcher = self.matcher.unwrap_or_else(|| Arc::new(NccMatcher::new()));

        let library = match self.library {
            Some(library) => library,
            None => TemplateLibrary::load(
                &config.templates.resolved(),
                rasterizer.as_ref(),
                config.render.classification_dpi,
            )?,
        };

        let reader = RegionReader::new(ocr, config.tools.language.clone());
        let classifier = TemplateClassifier::new(reader.clone(), matcher);
        let metadata = MetadataExtractor::new(
            Arc::clone(&rasterizer),
            reader,
            config.render.metadata_dpi,
        )
        .with_embedded_text(config.pipeline.prefer_embedded_text);
        let pool = ClassificationPool::new(config.pipeline.worker_count())?;

        Ok(Splitter {
            config,
            rasterizer,
            classifier,
            metadata,
            library,
            templates: TemplateCache::new(),
            geometry: GeometryCache::new(),
            pool,
        })
    }
}

impl Default for SplitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Classifies, segments, splits and files scanned voucher batches.
pub struct Splitter {
    config: SplitterConfig,
    rasterizer: Arc<dyn Rasterizer>,
    classifier: TemplateClassifier,
    metadata: MetadataExtractor,
    library: TemplateLibrary,
    templates: TemplateCache,
    geometry: GeometryCache,
    pool: ClassificationPool,
}

impl Splitter {
    pub fn builder() -> SplitterBuilder {
        SplitterBuilder::new()
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Classify every page of `pdf`, in page order.
    pub fn classify_pages(&self, pdf: &Path) -> Result<Vec<ClassificationResult>> {
        ensure_file(pdf)?;
        let dpi = self.config.render.classification_dpi;

        let sizes = self.geometry.page_sizes(pdf)?;
        let images = self.rasterizer.render(pdf, dpi)?;
        let pages: Vec<PageImage> = images
            .into_iter()
            .enumerate()
            .map(|(i, image)| {
                let size = sizes
                    .get(i)
                    .copied()
                    .unwrap_or_else(|| points_at(image.width(), image.height(), dpi));
                PageImage::new(i as u32, image, size)
            })
            .collect();

        info!("Classifying {} pages of {}", pages.len(), pdf.display());
        let results = self.pool.classify_pages(&pages, |page| {
            let (width, height) = page.dimensions();
            let templates = self.templates.get_or_resize(&self.library, width, height);
            let template = self.classifier.classify(page, &templates)?;
            Ok::<_, OcrError>(template.map(str::to_string))
        })?;

        let matched = results.iter().filter(|r| r.is_boundary()).count();
        info!("{}: {} of {} pages matched a template", pdf.display(), matched, results.len());
        Ok(results)
    }

    /// 1-based split numbers for `pdf`.
    pub fn classify_and_split(&self, pdf: &Path) -> Result<Vec<u32>> {
        Ok(find_split_numbers(&self.classify_pages(pdf)?))
    }

    /// Sub-document page ranges for `pdf`.
    pub fn detect_ranges(&self, pdf: &Path) -> Result<Vec<PageRange>> {
        let results = self.classify_pages(pdf)?;
        Ok(segment(&results, results.len() as u32))
    }

    /// Voucher number and date of a single sub-document.
    pub fn extract_metadata(&self, pdf: &Path) -> Result<VoucherMetadata> {
        ensure_file(pdf)?;
        self.metadata.extract_from_pdf(pdf)
    }

    /// Split `pdf` at `split_numbers` and file every sub-document into the
    /// success or failure partition of a new timestamp folder.
    ///
    /// On error the folder and everything written into it are removed.
    pub fn split_and_rename(
        &self,
        pdf: &Path,
        split_numbers: &[u32],
        output_root: &Path,
    ) -> Result<RenameReport> {
        ensure_file(pdf)?;
        let document = PdfDocument::open(pdf)?;
        let ranges = page_ranges(split_numbers, document.page_count());

        let folder = storage::allocate_batch_folder(output_root)?;
        match self.rename_ranges(pdf, &document, &ranges, &folder) {
            Ok(report) => {
                info!(
                    "{}: {} sub-documents recognized, {} unrecognized",
                    pdf.display(),
                    report.successes().count(),
                    report.failed().count()
                );
                Ok(report)
            }
            Err(e) => {
                warn!("Splitting {} failed, removing {}", pdf.display(), folder.display());
                if let Err(cleanup) = fs::remove_dir_all(&folder) {
                    warn!("Failed to remove {}: {}", folder.display(), cleanup);
                }
                Err(e)
            }
        }
    }

    /// Classify `pdf` and split-and-rename it at the detected boundaries.
    pub fn auto_split(&self, pdf: &Path, output_root: &Path) -> Result<RenameReport> {
        let split_numbers = self.classify_and_split(pdf)?;
        self.split_and_rename(pdf, &split_numbers, output_root)
    }

    /// Split several PDFs into one new timestamp folder without renaming.
    ///
    /// Inputs are validated before anything is written. An input that fails
    /// later has its partial output removed and is reported in
    /// [`BatchReport::failures`]; the remaining inputs are still processed.
    pub fn split_and_save(
        &self,
        requests: &[SplitRequest],
        output_root: &Path,
    ) -> Result<BatchReport> {
        if requests.is_empty() {
            return Err(SplitterError::EmptyBatch);
        }
        for request in requests {
            ensure_file(&request.pdf_path)?;
        }

        let folder = storage::allocate_batch_folder(output_root)?;
        let mut report = BatchReport::new(folder.clone(), requests.len());

        for request in requests {
            let mut written = Vec::new();
            match save_parts(request, &folder, &mut written) {
                Ok(()) => {
                    info!(
                        "{}: saved {} sub-documents",
                        request.pdf_path.display(),
                        written.len()
                    );
                    report.outputs.extend(written);
                }
                Err(e) => {
                    warn!("Failed to split {}: {}", request.pdf_path.display(), e);
                    storage::remove_files(written.iter().map(|o| &o.path));
                    report.failures.push(InputFailure {
                        source: request.pdf_path.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Treat every PDF in `source` as one sub-document and file it into
    /// `output_root/<source name>`, or a new timestamp folder when that name
    /// is taken. The files are moved; `source` is removed once it is empty.
    pub fn rename_folder(&self, source: &Path, output_root: &Path) -> Result<RenameReport> {
        if !source.is_dir() {
            return Err(SplitterError::InputNotFound(source.to_path_buf()));
        }
        let files: Vec<PathBuf> = storage::list_files(source)?
            .into_iter()
            .filter(|name| is_pdf(Path::new(name)))
            .map(|name| source.join(name))
            .collect();

        let folder = match source.file_name() {
            Some(name) => storage::claim_folder(output_root, &name.to_string_lossy())?,
            None => storage::allocate_batch_folder(output_root)?,
        };
        let mut report = empty_report(folder)?;
        for file in files {
            let stem = file_stem(&file);
            self.rename_one(&mut report, &file, &file, &stem);
        }

        match fs::remove_dir(source) {
            Ok(()) => debug!("Removed {}", source.display()),
            Err(e) => warn!("Keeping {}: {}", source.display(), e),
        }

        info!(
            "Renamed {} files from {}: {} recognized",
            report.records.len(),
            source.display(),
            report.successes().count()
        );
        Ok(report)
    }

    /// File each PDF in `files` as one sub-document into a new timestamp
    /// folder under `output_root`, without splitting.
    ///
    /// The inputs are copied first and left untouched. Inputs are validated
    /// before anything is written.
    pub fn rename_files(&self, files: &[PathBuf], output_root: &Path) -> Result<RenameReport> {
        if files.is_empty() {
            return Err(SplitterError::EmptyBatch);
        }
        for file in files {
            ensure_file(file)?;
        }

        let folder = storage::allocate_batch_folder(output_root)?;
        let mut report = empty_report(folder)?;
        let staging = tempfile::Builder::new()
            .prefix(".staging")
            .tempdir_in(&report.folder)?;

        for file in files {
            let stem = file_stem(file);
            let copy = storage::unique_path(staging.path(), &stem, "pdf");
            if let Err(e) = fs::copy(file, &copy) {
                warn!("Failed to copy {}: {}", file.display(), e);
                report.failures.push(InputFailure {
                    source: file.clone(),
                    error: e.to_string(),
                });
                continue;
            }
            self.rename_one(&mut report, file, &copy, &stem);
        }

        info!(
            "Renamed {} files into {}: {} recognized",
            report.records.len(),
            report.folder.display(),
            report.successes().count()
        );
        Ok(report)
    }

    /// Route one whole file, recording the outcome in `report`.
    fn rename_one(&self, report: &mut RenameReport, source: &Path, file: &Path, stem: &str) {
        let routed = self.route(
            source,
            file,
            None,
            stem,
            &report.success_folder,
            &report.failure_folder,
        );
        match routed {
            Ok(record) => report.records.push(record),
            Err(e) => {
                warn!("Failed to file {}: {}", file.display(), e);
                report.failures.push(InputFailure {
                    source: source.to_path_buf(),
                    error: e.to_string(),
                });
            }
        }
    }

    fn rename_ranges(
        &self,
        pdf: &Path,
        document: &PdfDocument,
        ranges: &[PageRange],
        folder: &Path,
    ) -> Result<RenameReport> {
        let (success_folder, failure_folder) = storage::create_subfolders(folder)?;
        let staging = tempfile::Builder::new().prefix(".staging").tempdir_in(folder)?;
        let stem = file_stem(pdf);

        let mut records = Vec::with_capacity(ranges.len());
        for (n, range) in ranges.iter().enumerate() {
            let Some(bytes) = document.extract_range(*range)? else {
                debug!("Skipping empty range {}", range);
                continue;
            };

            let temp_stem = format!("{}_split_{}", stem, n + 1);
            let temp_path = staging.path().join(format!("{}.pdf", temp_stem));
            fs::write(&temp_path, bytes)?;

            let record = self.route(
                pdf,
                &temp_path,
                Some(*range),
                &temp_stem,
                &success_folder,
                &failure_folder,
            )?;
            records.push(record);
        }

        Ok(RenameReport {
            folder: folder.to_path_buf(),
            success_folder,
            failure_folder,
            records,
            failures: Vec::new(),
        })
    }

    /// Extract metadata from `file` and move it into the matching partition.
    ///
    /// A failed extraction or a failed move into `success_dir` sends the
    /// file to `failure_dir` under `fallback_stem`.
    fn route(
        &self,
        source: &Path,
        file: &Path,
        range: Option<PageRange>,
        fallback_stem: &str,
        success_dir: &Path,
        failure_dir: &Path,
    ) -> Result<OutputRecord> {
        let metadata = match self.metadata.extract_from_pdf(file) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Metadata extraction failed for {}: {}", file.display(), e);
                VoucherMetadata::default()
            }
        };

        if let Some(stem) = metadata.file_stem() {
            let target = storage::unique_path(success_dir, &stem, "pdf");
            match storage::move_file(file, &target) {
                Ok(()) => {
                    info!("{} -> {}", describe(source, range), target.display());
                    return Ok(OutputRecord {
                        source: source.to_path_buf(),
                        range,
                        outcome: Outcome::Success,
                        path: target,
                        metadata,
                    });
                }
                Err(e) => warn!(
                    "Failed to move {} to {}: {}; filing as unrecognized",
                    file.display(),
                    target.display(),
                    e
                ),
            }
        } else {
            info!(
                "{}: no voucher number and date found",
                describe(source, range)
            );
        }

        let target = storage::unique_path(failure_dir, fallback_stem, "pdf");
        storage::move_file(file, &target)?;
        Ok(OutputRecord {
            source: source.to_path_buf(),
            range,
            outcome: Outcome::Failure,
            path: target,
            metadata,
        })
    }
}

/// Copy every range of `request` into `folder`, recording each written file.
fn save_parts(request: &SplitRequest, folder: &Path, written: &mut Vec<SplitOutput>) -> Result<()> {
    let document = PdfDocument::open(&request.pdf_path)?;
    let ranges = page_ranges(&request.split_numbers, document.page_count());
    let stem = file_stem(&request.pdf_path);

    for (n, range) in ranges.into_iter().enumerate() {
        let Some(bytes) = document.extract_range(range)? else {
            debug!("Skipping empty range {}", range);
            continue;
        };
        let path = storage::unique_path(folder, &format!("{}_part{}", stem, n + 1), "pdf");
        fs::write(&path, bytes)?;
        written.push(SplitOutput {
            source: request.pdf_path.clone(),
            range,
            path,
        });
    }
    Ok(())
}

/// Report over freshly created partitions of `folder`.
fn empty_report(folder: PathBuf) -> Result<RenameReport> {
    let (success_folder, failure_folder) = storage::create_subfolders(&folder)?;
    Ok(RenameReport {
        folder,
        success_folder,
        failure_folder,
        records: Vec::new(),
        failures: Vec::new(),
    })
}

fn ensure_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(SplitterError::InputNotFound(path.to_path_buf()))
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

/// Page size in points of an image rendered at `dpi`.
fn points_at(width: u32, height: u32, dpi: u32) -> (f32, f32) {
    let scale = 72.0 / dpi.max(1) as f32;
    (width as f32 * scale, height as f32 * scale)
}

fn describe(source: &Path, range: Option<PageRange>) -> String {
    match range {
        Some(range) => format!("{} pages {}", source.display(), range),
        None => source.display().to_string(),
    }
}
