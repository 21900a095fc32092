//! Batch command - split several PDFs from a manifest into one folder.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;

use splitter_core::{BatchReport, SplitRequest};

use super::context::{area_dir, build_splitter, load_config, SPLIT_AREA};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// JSON manifest: [{"pdf_path": ..., "split_numbers": [...]}, ...]
    #[arg(required = true)]
    manifest: PathBuf,

    /// Output folder (default: <output_dir>/split)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write summary.csv into the batch folder
    #[arg(long)]
    summary: bool,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let manifest = fs::read_to_string(&args.manifest)
        .map_err(|e| anyhow::anyhow!("Cannot read {}: {}", args.manifest.display(), e))?;
    let requests: Vec<SplitRequest> = serde_json::from_str(&manifest)?;

    let root = area_dir(&config, SPLIT_AREA, args.output.as_deref());
    let splitter = build_splitter(config)?;
    let report = splitter.split_and_save(&requests, &root)?;

    for output in &report.outputs {
        println!(
            "  {} {} pages {} -> {}",
            style("✓").green(),
            output.source.display(),
            output.range,
            output.path.display()
        );
    }

    if args.summary {
        let summary_path = report.folder.join("summary.csv");
        write_summary(&summary_path, &report)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Split {} files into {} documents in {:?}",
        style("✓").green(),
        report.total_inputs,
        report.outputs.len(),
        start.elapsed()
    );
    println!("   Folder: {}", report.folder.display());

    if !report.failures.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for failure in &report.failures {
            println!("  - {}: {}", failure.source.display(), failure.error);
        }
    }

    match report.error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn write_summary(path: &Path, report: &BatchReport) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["source", "status", "pages", "output", "error"])?;

    for output in &report.outputs {
        wtr.write_record([
            output.source.display().to_string().as_str(),
            "success",
            &output.range.to_string(),
            &output.path.display().to_string(),
            "",
        ])?;
    }
    for failure in &report.failures {
        wtr.write_record([
            failure.source.display().to_string().as_str(),
            "error",
            "",
            "",
            &failure.error,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
