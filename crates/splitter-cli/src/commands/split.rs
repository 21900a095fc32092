//! Split command - split a PDF at known pages and file the parts.

use std::path::PathBuf;

use clap::Args;
use console::style;

use super::context::{area_dir, build_splitter, load_config, print_rename_report, RENAMED_AREA};

/// Arguments for the split command.
#[derive(Args)]
pub struct SplitArgs {
    /// Input PDF
    #[arg(required = true)]
    input: PathBuf,

    /// First page (1-based) of every document, e.g. 1,4,7
    #[arg(short, long, value_delimiter = ',', required = true)]
    pages: Vec<u32>,

    /// Output folder (default: <output_dir>/renamed)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: SplitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let root = area_dir(&config, RENAMED_AREA, args.output.as_deref());
    let splitter = build_splitter(config)?;

    println!(
        "{} Splitting {} at pages {:?}",
        style("ℹ").blue(),
        args.input.display(),
        args.pages
    );
    let report = splitter.split_and_rename(&args.input, &args.pages, &root)?;
    print_rename_report(&report);

    Ok(())
}
