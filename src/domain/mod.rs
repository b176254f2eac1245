//! Core data types shared across ingest, derivation, filtering and rendering.

pub mod column;
pub mod config;
pub mod record;
pub mod sla;
pub mod state;
pub mod status;
pub mod table;

use chrono::NaiveDate;

pub use column::{Cell, Column};
pub use config::Config;
pub use record::{DerivedFields, DerivedRecord, ProjectRecord};
pub use sla::SlaPolicy;
pub use state::LabelMap;
pub use status::Status;
pub use table::{ProjectTable, Snapshot};

/// Version of the JSON report layout written by `report --format json`.
pub const REPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Label used when a row has no value for a grouping dimension.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Metadata columns stamped on every exported row.
pub const EXPORT_DATE_HEADER: &str = "Export Date";
pub const EXPORT_SOURCE_HEADER: &str = "Export Source";

/// Out-of-band date meaning "not yet recorded".
pub fn placeholder_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// True when `date` is the placeholder sentinel.
pub fn is_placeholder(date: NaiveDate) -> bool {
    date == placeholder_date()
}

/// Drop null and placeholder dates, keeping only real calendar anchors.
pub fn valid_anchor(date: Option<NaiveDate>) -> Option<NaiveDate> {
    date.filter(|d| !is_placeholder(*d))
}
