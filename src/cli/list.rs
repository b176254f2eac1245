//! List command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};

use super::filter_args::FilterArgs;
use super::utils::{emit, parse_csv_multi, stdout_is_terminal};
use super::{load_table, settings};
use crate::config::CliOverrides;
use crate::domain::Column;
use crate::filter;
use crate::render::{render_csv, render_jsonl, render_table, snapshot_columns};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    Table,
    Csv,
    Jsonl,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Snapshot to read instead of the discovered one
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: ListFormat,

    /// Columns to show (keys or headers, comma-separated)
    #[arg(long, value_name = "COLUMNS")]
    pub columns: Vec<String>,

    /// Sort by this column (descending unless --asc); nulls always last
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<String>,

    /// Sort ascending
    #[arg(long, requires = "sort")]
    pub asc: bool,

    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

fn parse_column(value: &str) -> Result<Column> {
    value.parse::<Column>().map_err(anyhow::Error::msg)
}

pub fn run(args: ListArgs, config_path: Option<&Path>, overrides: &CliOverrides) -> Result<()> {
    let config = settings(config_path, overrides)?;
    let Some(table) = load_table(&config, args.input.as_deref())? else {
        return Ok(());
    };

    let filter_config = args.filters.resolve(&config, &table)?;
    let mut filtered = filter::apply(&table, &filter_config);

    if let Some(sort) = &args.sort {
        let column = parse_column(sort).context("Invalid --sort column")?;
        filtered.sort_by_column(column, args.asc);
    }

    let requested = parse_csv_multi(&args.columns);
    let columns: Vec<Column> = if requested.is_empty() {
        match args.format {
            ListFormat::Table => Column::OVERVIEW.to_vec(),
            ListFormat::Csv | ListFormat::Jsonl => snapshot_columns(),
        }
    } else {
        requested
            .iter()
            .map(|c| parse_column(c))
            .collect::<Result<_>>()
            .context("Invalid --columns value")?
    };

    let content = match args.format {
        ListFormat::Table => {
            let color = args.output.is_none() && stdout_is_terminal();
            render_table(&filtered.rows, &columns, color)
        }
        ListFormat::Csv => render_csv(&filtered.rows, &columns)?,
        ListFormat::Jsonl => render_jsonl(&filtered.rows, &columns),
    };
    emit(args.output.as_deref(), &content)
}
