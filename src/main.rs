//! Solflat CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "solflat")]
#[command(about = "Flatten a multi-file Solidity compilation into one file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Working root: holds solflat.toml and receives saved output
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Flatten the target of a compilation event
    Flatten {
        /// Compilation-finished event as JSON
        event: PathBuf,

        /// Print the flattened source to stdout
        #[arg(long)]
        stdout: bool,

        /// Do not write the flattened file under the root
        #[arg(long)]
        no_save: bool,

        /// File that stands in for the clipboard
        #[arg(long)]
        clipboard: Option<PathBuf>,
    },
    /// Print the concatenation order without flattening
    Order {
        /// Compilation-finished event as JSON
        event: PathBuf,
    },
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "solflat={0},solflat_core={0},solflat_host={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Solflat v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Working root: {}", cli.root.display());

    match cli.command {
        Commands::Flatten { event, stdout, no_save, clipboard } => {
            commands::flatten(cli.root, event, stdout, !no_save, clipboard).await
        }
        Commands::Order { event } => {
            commands::order(cli.root, event).await
        }
        Commands::Version => {
            println!("Solflat v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
