//! Setup shared by the commands: configuration, the splitter, output areas.

use std::path::{Path, PathBuf};

use anyhow::Context;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use splitter_core::models::SplitterConfig;
use splitter_core::{Outcome, RenameReport, Splitter};

/// Output area for batch splits.
pub const SPLIT_AREA: &str = "split";
/// Output area for split-and-rename runs.
pub const RENAMED_AREA: &str = "renamed";
/// Output area for renamed batch folders.
pub const RENAME_AFTER_SPLIT_AREA: &str = "rename_after_split";
/// Output area for PDFs renamed without splitting.
pub const RENAME_WITHOUT_SPLIT_AREA: &str = "rename_without_split";

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("splitter")
        .join("config.json")
}

/// Config file in use: `--config` or the platform default.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration; a missing default file means defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<SplitterConfig> {
    let path = config_file(config_path);
    if config_path.is_none() && !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(SplitterConfig::default());
    }

    SplitterConfig::from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

pub fn build_splitter(config: SplitterConfig) -> anyhow::Result<Splitter> {
    Splitter::builder()
        .with_config(config)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to set up the splitter: {}", e))
}

/// `explicit`, or `area` under the configured output folder.
pub fn area_dir(config: &SplitterConfig, area: &str, explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.pipeline.output_dir.join(area))
}

/// Expand glob patterns; plain paths are taken as given.
pub fn expand_inputs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        if pattern.contains(['*', '?', '[']) {
            let matched: Vec<PathBuf> = glob(pattern)?
                .filter_map(|r| r.ok())
                .filter(|p| {
                    p.extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
                })
                .collect();
            if matched.is_empty() {
                anyhow::bail!("No PDF files found for pattern: {}", pattern);
            }
            files.extend(matched);
        } else {
            files.push(PathBuf::from(pattern));
        }
    }

    for file in &files {
        if !file.is_file() {
            anyhow::bail!("Input file not found: {}", file.display());
        }
    }
    Ok(files)
}

pub fn progress_bar(len: u64) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

pub fn print_rename_report(report: &RenameReport) {
    for record in &report.records {
        let name = record
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let pages = record
            .range
            .map(|r| format!("pages {} ", r))
            .unwrap_or_default();
        match record.outcome {
            Outcome::Success => println!("  {} {}-> {}", style("✓").green(), pages, name),
            Outcome::Failure => println!("  {} {}-> {}", style("✗").red(), pages, name),
        }
    }
    for failure in &report.failures {
        println!(
            "  {} {}: {}",
            style("!").yellow(),
            failure.source.display(),
            failure.error
        );
    }

    println!();
    println!(
        "{} {} recognized, {} unrecognized",
        style("ℹ").blue(),
        style(report.successes().count()).green(),
        style(report.failed().count()).red()
    );
    println!("   Success: {}", report.success_folder.display());
    println!("   Failure: {}", report.failure_folder.display());
}
