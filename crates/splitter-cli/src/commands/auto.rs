//! Auto command - detect boundaries, split and file each input.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::warn;

use super::context::{
    area_dir, build_splitter, expand_inputs, load_config, print_rename_report, RENAMED_AREA,
};

/// Arguments for the auto command.
#[derive(Args)]
pub struct AutoArgs {
    /// Input PDF files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output folder (default: <output_dir>/renamed)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: AutoArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let inputs = expand_inputs(&args.inputs)?;
    let root = area_dir(&config, RENAMED_AREA, args.output.as_deref());
    let splitter = build_splitter(config)?;

    let mut failed = Vec::new();
    for input in &inputs {
        println!("{} {}", style("▶").cyan(), input.display());
        match splitter.auto_split(input, &root) {
            Ok(report) => print_rename_report(&report),
            Err(e) => {
                warn!("Failed to process {}: {}", input.display(), e);
                println!("  {} {}", style("✗").red(), e);
                failed.push(input);
            }
        }
        println!();
    }

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        inputs.len(),
        start.elapsed()
    );

    if !failed.is_empty() {
        anyhow::bail!("{} of {} files failed", failed.len(), inputs.len());
    }
    Ok(())
}
