//! Export command implementation
//!
//! Turns a raw extract into the derived snapshot read by `report` and `list`.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use super::settings;
use crate::aggregate::{count_by, performance_window, Dimension};
use crate::config::CliOverrides;
use crate::derive::Deriver;
use crate::domain::{is_placeholder, Config, ProjectRecord};
use crate::ingest::{clean_record, load_snapshot, resolve_snapshot};
use crate::render::{render_jsonl, snapshot_columns, write_csv_file, ExportStamp, PERFORMANCE_COLUMNS};
use crate::utils::format_with_commas;

#[derive(Args)]
pub struct ExportArgs {
    /// Raw CSV extract to process
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Directory for output files
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Also write a JSONL copy of the snapshot
    #[arg(long)]
    pub jsonl: bool,

    /// Only write the `latest` files, without timestamped copies
    #[arg(long)]
    pub no_timestamp: bool,

    /// Keep HTML markup in comment columns
    #[arg(long)]
    pub keep_markup: bool,
}

pub fn run(args: ExportArgs, config_path: Option<&Path>, overrides: CliOverrides) -> Result<()> {
    let start_time = Instant::now();

    let overrides = CliOverrides { output_dir: args.output_dir.clone(), ..overrides };
    let config = settings(config_path, &overrides)?;

    let input = resolve_snapshot(Some(&args.input), &config)?;
    let mut snapshot = load_snapshot(&input)
        .with_context(|| format!("Failed to load raw extract {}", input.display()))?;
    info!(rows = snapshot.records.len(), path = %input.display(), "loaded raw extract");

    if config.clean_markup && !args.keep_markup {
        snapshot.records.iter_mut().for_each(clean_record);
    }
    sort_for_export(&mut snapshot.records);

    let deriver = Deriver::from_config(&config);
    let table = deriver.derive_table(snapshot);

    let now = Local::now().naive_local();
    let stamp = ExportStamp { exported_at: now, source: config.export_source() };
    let timestamp = now.format("%Y%m%d_%H%M%S").to_string();
    let columns = snapshot_columns();

    let performance =
        performance_window(&table.rows, table.today, config.performance_window_months);

    let mut written: Vec<PathBuf> = Vec::new();
    let out = &config.output_dir;

    let mut project_targets = vec![out.join(&config.snapshot_file)];
    let mut performance_targets = vec![out.join(&config.performance_file)];
    if !args.no_timestamp {
        project_targets.push(out.join(format!("projects_{timestamp}.csv")));
        performance_targets.push(out.join(format!("performance_{timestamp}.csv")));
    }
    for path in project_targets {
        write_csv_file(&path, &table.rows, &columns, Some(&stamp))?;
        written.push(path);
    }
    for path in performance_targets {
        write_csv_file(&path, &performance, &PERFORMANCE_COLUMNS, Some(&stamp))?;
        written.push(path);
    }
    if args.jsonl {
        let path = out.join(jsonl_name(&config));
        std::fs::write(&path, render_jsonl(&table.rows, &columns))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }

    println!("Exported {} projects", format_with_commas(table.len()));
    println!("Performance records: {}", format_with_commas(performance.len()));
    println!("Status breakdown:");
    for c in count_by(&table.rows, Dimension::Status, &config.service_area_map()) {
        println!("  {}: {}", c.label, c.count);
    }
    println!("Files:");
    for path in &written {
        println!("  {}", path.display());
    }
    info!(elapsed_ms = start_time.elapsed().as_millis() as u64, "export finished");

    Ok(())
}

/// Placeholder kickoffs first, then newest kickoff first, missing dates last.
fn sort_for_export(records: &mut [ProjectRecord]) {
    records.sort_by_key(|r| match r.kickoff {
        Some(date) if is_placeholder(date) => (0, std::cmp::Reverse(None)),
        Some(date) => (1, std::cmp::Reverse(Some(date))),
        None => (2, std::cmp::Reverse(None)),
    });
}

fn jsonl_name(config: &Config) -> String {
    let stem = Path::new(&config.snapshot_file)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("projects_latest");
    format!("{stem}.jsonl")
}
