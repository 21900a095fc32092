//! Rename command - file split PDFs by voucher and date.

use std::path::PathBuf;

use clap::Args;
use console::style;

use super::context::{
    area_dir, build_splitter, expand_inputs, load_config, print_rename_report,
    RENAME_AFTER_SPLIT_AREA, RENAME_WITHOUT_SPLIT_AREA, SPLIT_AREA,
};

/// Arguments for the rename command.
#[derive(Args)]
pub struct RenameArgs {
    /// Folder path or batch folder name under <output_dir>/split; PDF files or glob patterns with --files
    #[arg(required = true)]
    targets: Vec<String>,

    /// Rename individual PDFs without splitting; inputs are copied, not moved
    #[arg(long)]
    files: bool,

    /// Output folder (default: <output_dir>/rename_after_split, or <output_dir>/rename_without_split with --files)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: RenameArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if args.files {
        let inputs = expand_inputs(&args.targets)?;
        let root = area_dir(&config, RENAME_WITHOUT_SPLIT_AREA, args.output.as_deref());
        let splitter = build_splitter(config)?;

        println!("{} Renaming {} files", style("ℹ").blue(), inputs.len());
        let report = splitter.rename_files(&inputs, &root)?;
        print_rename_report(&report);
        return Ok(());
    }

    let [folder] = args.targets.as_slice() else {
        anyhow::bail!(
            "Expected one folder, got {}; use --files to rename PDFs",
            args.targets.len()
        );
    };
    let source = {
        let given = PathBuf::from(folder);
        if given.is_dir() {
            given
        } else {
            area_dir(&config, SPLIT_AREA, None).join(folder)
        }
    };
    if !source.is_dir() {
        anyhow::bail!("Folder not found: {}", folder);
    }

    let root = area_dir(&config, RENAME_AFTER_SPLIT_AREA, args.output.as_deref());
    let splitter = build_splitter(config)?;

    println!("{} Renaming files in {}", style("ℹ").blue(), source.display());
    let report = splitter.rename_folder(&source, &root)?;
    print_rename_report(&report);

    Ok(())
}
