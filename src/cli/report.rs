//! Report command implementation

use anyhow::Result;
use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::filter_args::FilterArgs;
use super::guided::choose_session;
use super::utils::{emit, interactive_terminal, stdout_is_terminal};
use super::{load_table, settings};
use crate::aggregate::{Dimension, Span};
use crate::config::CliOverrides;
use crate::filter;
use crate::render::{render_dashboard, report_json, write_report, ReportData, ReportOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Snapshot to read instead of the discovered one
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Write the report to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pick filters interactively (ignored outside a terminal)
    #[arg(long)]
    pub guided: bool,

    /// Omit the generation timestamp from JSON output
    #[arg(long)]
    pub no_timestamp: bool,

    /// Duration measured against the SLA in the performance section
    #[arg(long, value_enum, default_value = "testing-info")]
    pub span: Span,

    /// Extra count blocks (repeatable or comma-separated)
    #[arg(long = "by", value_enum, value_delimiter = ',', value_name = "DIMENSION")]
    pub breakdowns: Vec<Dimension>,
}

pub fn run(args: ReportArgs, config_path: Option<&Path>, overrides: &CliOverrides) -> Result<()> {
    let config = settings(config_path, overrides)?;
    let Some(table) = load_table(&config, args.input.as_deref())? else {
        return Ok(());
    };

    let mut session = args.filters.base_session(&config, &table)?;
    if args.guided {
        if interactive_terminal() {
            session = choose_session(&table, &config, session)?;
        } else {
            eprintln!("info: non-interactive session detected; ignoring --guided");
        }
    }
    args.filters.apply_flags(&mut session)?;
    let filter_config = args.filters.finish(&session, &config)?;

    let filtered = filter::apply(&table, &filter_config);
    debug!(matched = filtered.len(), "report rows");
    let options = ReportOptions { span: args.span, breakdowns: args.breakdowns.clone() };
    let data = ReportData::compute(&table, &filtered, &filter_config, &config, &options);

    if let (ReportFormat::Json, Some(path)) = (args.format, args.output.as_deref()) {
        write_report(path, &data, !args.no_timestamp)?;
        eprintln!("Wrote {}", path.display());
        return Ok(());
    }

    let content = match args.format {
        ReportFormat::Text => {
            let color = args.output.is_none() && stdout_is_terminal();
            render_dashboard(&data, color)
        }
        ReportFormat::Json => {
            let value = report_json(&data, !args.no_timestamp)?;
            format!("{}\n", serde_json::to_string_pretty(&value)?)
        }
    };
    emit(args.output.as_deref(), &content)
}
