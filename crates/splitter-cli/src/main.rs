//! CLI application for splitting scanned voucher batches.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{auto, batch, classify, config, list, rename, split};

/// Voucher batch splitter - split scanned PDF batches into named documents
#[derive(Parser)]
#[command(name = "splitter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stage PDFs and detect where each one splits
    Classify(classify::ClassifyArgs),

    /// Split a PDF at given pages and file the parts by voucher and date
    Split(split::SplitArgs),

    /// Detect boundaries, split and file in one step
    Auto(auto::AutoArgs),

    /// Split several PDFs from a manifest into one folder
    Batch(batch::BatchArgs),

    /// File a folder of already split PDFs by voucher and date
    Rename(rename::RenameArgs),

    /// List produced folders and files
    List(list::ListArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Classify(args) => classify::run(args, config_path).await,
        Commands::Split(args) => split::run(args, config_path).await,
        Commands::Auto(args) => auto::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Rename(args) => rename::run(args, config_path).await,
        Commands::List(args) => list::run(args, config_path).await,
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
