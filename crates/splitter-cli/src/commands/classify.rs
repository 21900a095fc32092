//! Classify command - stage PDFs and report their split numbers.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use super::context::{build_splitter, expand_inputs, load_config, progress_bar};
use super::staging::{remove_staged, stage_files};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input PDF files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Folder for the staged copies (default: the configured output folder)
    #[arg(short, long)]
    uploads: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Split numbers of one staged upload.
#[derive(Serialize)]
struct ClassifiedUpload {
    original_filename: String,
    pdf_path: PathBuf,
    split_numbers: Vec<u32>,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let inputs = expand_inputs(&args.inputs)?;
    let upload_dir = args
        .uploads
        .unwrap_or_else(|| config.pipeline.output_dir.clone());
    let splitter = build_splitter(config)?;

    let staged = stage_files(&inputs, &upload_dir).await?;
    info!("Staged {} files in {}", staged.len(), upload_dir.display());

    let pb = progress_bar(staged.len() as u64)?;
    let mut uploads = Vec::with_capacity(staged.len());
    for file in &staged {
        pb.set_message(file.original_filename.clone());
        match splitter.classify_and_split(&file.path) {
            Ok(split_numbers) => uploads.push(ClassifiedUpload {
                original_filename: file.original_filename.clone(),
                pdf_path: file.path.clone(),
                split_numbers,
            }),
            Err(e) => {
                pb.abandon();
                remove_staged(&staged).await;
                anyhow::bail!("Failed to classify {}: {}", file.original_filename, e);
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let json = serde_json::to_string_pretty(&uploads)?;
    if let Some(output_path) = &args.output {
        fs::write(output_path, &json)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}
