//! Output rendering (CSV, JSONL, JSON report, terminal views)

pub mod csv;
pub mod jsonl;
pub mod report;
pub mod summary;

pub use self::csv::{render_csv, snapshot_columns, write_csv_file, ExportStamp, PERFORMANCE_COLUMNS};
pub use jsonl::render_jsonl;
pub use report::{report_json, write_report, Breakdown, ReportData, ReportOptions};
pub use summary::{render_dashboard, render_table};
