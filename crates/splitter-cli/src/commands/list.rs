//! List command - show produced batch folders and their files.

use std::path::PathBuf;

use clap::Args;
use console::style;

use splitter_core::storage::{self, FAILURE_DIR, SUCCESS_DIR};

use super::context::{
    area_dir, load_config, RENAMED_AREA, RENAME_AFTER_SPLIT_AREA, RENAME_WITHOUT_SPLIT_AREA,
    SPLIT_AREA,
};

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Batch folder to show; lists all batch folders when omitted
    timestamp: Option<String>,

    /// Which output area to list
    #[arg(short, long, value_enum, default_value = "renamed")]
    area: Area,

    /// Output folder to list instead of the configured area
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Area {
    /// Batch splits
    Split,
    /// Split-and-rename runs
    Renamed,
    /// Renamed batch folders
    RenameAfterSplit,
    /// PDFs renamed without splitting
    RenameWithoutSplit,
}

impl Area {
    fn dir_name(self) -> &'static str {
        match self {
            Area::Split => SPLIT_AREA,
            Area::Renamed => RENAMED_AREA,
            Area::RenameAfterSplit => RENAME_AFTER_SPLIT_AREA,
            Area::RenameWithoutSplit => RENAME_WITHOUT_SPLIT_AREA,
        }
    }
}

pub async fn run(args: ListArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let root = area_dir(&config, args.area.dir_name(), args.output.as_deref());

    let Some(timestamp) = args.timestamp else {
        let folders = storage::list_folders(&root)?;
        if folders.is_empty() {
            anyhow::bail!("No folders found in {}", root.display());
        }
        for folder in folders {
            println!("{}", folder);
        }
        return Ok(());
    };

    let folder = root.join(&timestamp);
    if !folder.is_dir() {
        anyhow::bail!("Timestamp folder not found: {}", timestamp);
    }

    if args.area == Area::Split {
        for file in storage::list_files(&folder)?
            .into_iter()
            .filter(|f| f.to_lowercase().ends_with(".pdf"))
        {
            println!("{}", folder.join(file).display());
        }
        return Ok(());
    }

    for partition in [SUCCESS_DIR, FAILURE_DIR] {
        let dir = folder.join(partition);
        let files = storage::list_files(&dir)?;
        println!(
            "{} {} ({} files)",
            style("ℹ").blue(),
            dir.display(),
            files.len()
        );
        for file in files {
            println!("  {}", file);
        }
    }

    Ok(())
}
