//! Triage Control - CLI for the cast triage pipeline.
//!
//! Fetches per-cast processing-error records, classifies them and writes
//! per-organization reports plus per-class tracking issues.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;

#[derive(Parser)]
#[command(name = "triagectl")]
#[command(about = "Cast triage - CTD processing-error reports and tracking issues", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline and write report documents
    Run {
        /// Read records from a local JSON file
        #[arg(long, conflicts_with = "api_root")]
        input: Option<PathBuf>,

        /// Fetch records from the cast database REST API
        #[arg(long)]
        api_root: Option<String>,

        /// Output directory for generated documents
        #[arg(long, default_value = "reports")]
        output: PathBuf,

        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Classify records and print the class table without writing files
    Preview {
        /// Read records from a local JSON file
        #[arg(long, conflicts_with = "api_root")]
        input: Option<PathBuf>,

        /// Fetch records from the cast database REST API
        #[arg(long)]
        api_root: Option<String>,

        /// Configuration file (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            api_root,
            output,
            config,
        } => triagectl::commands::run(input, api_root, output, config),
        Commands::Preview {
            input,
            api_root,
            config,
        } => triagectl::commands::preview(input, api_root, config),
    }
}
