//! CLI for the clipset dataset-preparation pipeline.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clipset_core::config;
use std::path::PathBuf;

use commands::{run_batches, run_status};

/// Top-level CLI for clipset.
#[derive(Debug, Parser)]
#[command(name = "clipset")]
#[command(about = "clipset: resumable clip download and trim pipeline", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run batches of pending records until done or the operator stops.
    Run {
        /// Source manifest CSV (video id, start seconds, label, split).
        /// Required on a first run; ignored once a record store exists.
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Known-unavailable log; listed ids are excluded at ingestion.
        #[arg(long)]
        unavailable_log: Option<PathBuf>,

        /// Worker pool width (default from config).
        #[arg(long, value_name = "N")]
        workers: Option<usize>,

        /// Keep running batches without prompting, until a batch makes no
        /// progress or nothing is left to do.
        #[arg(long)]
        yes: bool,
    },

    /// Show per-state record counts from the store.
    Status,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                manifest,
                unavailable_log,
                workers,
                yes,
            } => {
                run_batches(
                    &cfg,
                    manifest.as_deref(),
                    unavailable_log.as_deref(),
                    workers,
                    yes,
                )
                .await?;
            }
            CliCommand::Status => run_status(&cfg)?,
        }

        Ok(())
    }
}
