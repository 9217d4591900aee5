//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific
//! modules.

mod harvest;
mod init;
mod run_all;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "cine")]
#[command(about = "Film list harvesting and pipeline automation")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter cineharvest.toml
    Init,

    /// Harvest a film list into a CSV
    Harvest {
        /// Listing URL; pages are fetched at {base}page/{n}/
        #[arg(long)]
        base_url: Option<String>,

        /// Stop after this many accepted films
        #[arg(long)]
        max_items: Option<usize>,

        /// Minimum rating count a film needs to be admitted
        #[arg(long)]
        min_popularity: Option<u64>,

        /// Directory for the output CSV and run log
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Basename (without extension) of the output CSV
        #[arg(long)]
        list_name: Option<String>,

        /// Flat delay between listing pages, in seconds
        #[arg(long)]
        page_delay: Option<f64>,

        /// Disable the progress bar (plain console output)
        #[arg(long)]
        no_progress: bool,
    },

    /// Run the full pipeline: scrape, process, build, package
    RunAll,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => init::cmd_init().await,
        Commands::Harvest {
            base_url,
            max_items,
            min_popularity,
            output_dir,
            list_name,
            page_delay,
            no_progress,
        } => {
            let mut config = settings.harvest;
            if let Some(v) = base_url {
                config.base_list_url = v;
            }
            if let Some(v) = max_items {
                config.max_items = v;
            }
            if let Some(v) = min_popularity {
                config.min_popularity_count = v;
            }
            if let Some(v) = output_dir {
                config.output_dir = v;
            }
            if let Some(v) = list_name {
                config.list_name = v;
            }
            if let Some(v) = page_delay {
                config.page_delay_seconds = v;
            }
            harvest::cmd_harvest(config, no_progress).await
        }
        Commands::RunAll => run_all::cmd_run_all(&settings).await,
    }
}
