//! CLI application for scanning and categorizing receipts.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, categories, config, list, remove, scan};

/// Receipt scanner - extract, categorize, and track scanned receipts
#[derive(Parser)]
#[command(name = "recit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the record store file (overrides config)
    #[arg(long, global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a receipt from one or more images (ordered pages)
    Scan(scan::ScanArgs),

    /// Scan every image matching a glob pattern, one record each
    Batch(batch::BatchArgs),

    /// List stored records
    List(list::ListArgs),

    /// List category aggregates
    Categories(categories::CategoriesArgs),

    /// Remove a stored record
    Remove(remove::RemoveArgs),

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

    let ctx = commands::Context::resolve(cli.config.as_deref(), cli.data_file)?;

    // Execute command
    match cli.command {
        Commands::Scan(args) => scan::run(args, &ctx).await,
        Commands::Batch(args) => batch::run(args, &ctx).await,
        Commands::List(args) => list::run(args, &ctx).await,
        Commands::Categories(args) => categories::run(args, &ctx).await,
        Commands::Remove(args) => remove::run(args, &ctx).await,
        Commands::Config(args) => config::run(args).await,
    }
}
