//! CLI module for TSLite
//!
//! - `classify`: submit a product description and record the result
//! - `history`: list, show, replay, export, copy or clear past results
//!
//! History positions are 1-based on the command line (1 = newest).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tslite_client::RequestOrchestrator;
use tslite_history::{ExportFormat, FileStorage, HistoryStore};

use crate::config::{load_config, AppConfig};

pub mod classify;
pub mod history;
pub mod render;

/// TSLite CLI
#[derive(Parser, Debug)]
#[command(name = "tslite")]
#[command(about = "Tariff classification client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify a product description
    Classify(ClassifyArgs),
    /// Inspect and manage past classifications
    #[command(subcommand)]
    History(HistoryCommands),
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Product description
    #[arg(required = true, num_args = 1..)]
    pub description: Vec<String>,
    /// Country of origin
    #[arg(long)]
    pub country: Option<String>,
    /// Declared customs value
    #[arg(long)]
    pub value: Option<f64>,
    /// Print the normalized result as JSON
    #[arg(long)]
    pub json: bool,
    /// Do not add the result to history
    #[arg(long)]
    pub no_record: bool,
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommands {
    /// List recent classifications
    List {
        /// Maximum rows to show
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Show one classification
    Show {
        /// Position (1 = newest)
        position: usize,
        /// Print the entry as JSON
        #[arg(long)]
        json: bool,
    },
    /// Submit a past request again
    Replay {
        /// Position (1 = newest)
        position: usize,
        /// Print the normalized result as JSON
        #[arg(long)]
        json: bool,
        /// Do not add the result to history
        #[arg(long)]
        no_record: bool,
    },
    /// Export one classification or the whole history
    Export {
        /// Export only this position (1 = newest)
        #[arg(long)]
        position: Option<usize>,
        /// json or csv
        #[arg(long, default_value = "csv")]
        format: ExportFormat,
        /// Output file or directory (stdout if omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Copy a classification result to the clipboard
    Copy {
        /// Position (1 = newest)
        position: usize,
    },
    /// Delete all history
    Clear {
        /// Skip confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Wired collaborators for a command
pub struct App {
    pub config: AppConfig,
    pub store: HistoryStore,
}

impl App {
    fn open() -> Result<Self> {
        let config = load_config()?;
        let storage = Arc::new(FileStorage::new(config.history.data_dir()));
        let store = HistoryStore::open(storage, config.history.store_config());
        Ok(Self { config, store })
    }

    fn orchestrator(&self) -> Result<RequestOrchestrator> {
        let client_config = self.config.service.client_config()?;
        RequestOrchestrator::new(client_config).context("Failed to create HTTP client")
    }
}

/// Run the CLI command
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Classify(args)) => {
            let mut app = App::open()?;
            classify::run(&mut app, args).await
        }
        Some(Commands::History(cmd)) => {
            let mut app = App::open()?;
            history::run(&mut app, cmd).await
        }
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}
