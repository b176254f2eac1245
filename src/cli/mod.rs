//! Command-line interface for design-tracker
//!
//! Provides `export`, `report`, `list` and `completions` subcommands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{load_config, merge_cli_with_config, CliOverrides};
use crate::derive::Deriver;
use crate::domain::{Config, ProjectTable};
use crate::ingest::{load_snapshot, resolve_snapshot, IngestError};

mod export;
mod filter_args;
mod guided;
mod list;
mod report;
mod utils;

/// Track design project SLAs from exported project snapshots
#[derive(Parser)]
#[command(name = "design-tracker")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (design-tracker.toml or tracker.yml)
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding exported snapshots
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Reference date for elapsed-time fields (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    today: Option<NaiveDate>,

    /// Days allowed in Design before a project is overdue
    #[arg(long, global = true, value_name = "DAYS")]
    sla_days: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive SLA fields from a raw extract and write the snapshot files
    Export(Box<export::ExportArgs>),

    /// Summarise the current snapshot: metrics, counts and performance
    Report(report::ReportArgs),

    /// List projects matching the filters
    List(list::ListArgs),

    /// Print shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    shell: Shell,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG in the environment always takes precedence; --verbose falls back to DEBUG.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    let config_path = cli.config.as_deref();
    let overrides = CliOverrides {
        data_dir: cli.data_dir.clone(),
        output_dir: None,
        today: cli.today,
        sla_days: cli.sla_days,
    };
    match cli.command {
        Commands::Export(args) => export::run(*args, config_path, overrides),
        Commands::Report(args) => report::run(args, config_path, &overrides),
        Commands::List(args) => list::run(args, config_path, &overrides),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            clap_complete::generate(args.shell, &mut command, "design-tracker", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// File config from the working directory (or `--config`), then env, then flags.
fn settings(config_path: Option<&Path>, overrides: &CliOverrides) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let file_config = load_config(&cwd, config_path)?;
    merge_cli_with_config(file_config, overrides)
}

/// Load and derive the snapshot; `None` after telling the user there is no data.
fn load_table(config: &Config, input: Option<&Path>) -> Result<Option<ProjectTable>> {
    let path = match resolve_snapshot(input, config) {
        Ok(path) => path,
        Err(err @ IngestError::NoSnapshot { .. }) => {
            eprintln!("{err}");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    let snapshot = match load_snapshot(&path) {
        Ok(snapshot) => snapshot,
        Err(err @ IngestError::EmptySnapshot { .. }) => {
            eprintln!("{err}");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };
    Ok(Some(Deriver::from_config(config).derive_table(snapshot)))
}
