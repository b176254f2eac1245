//! In-memory tables: the loaded snapshot and its derived form.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::column::Column;
use super::record::{DerivedRecord, ProjectRecord};

/// Records exactly as loaded, plus what the loader learned about the file.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub records: Vec<ProjectRecord>,
    /// Source columns present in the file header.
    pub columns: BTreeSet<Column>,
    /// Latest `Export Date` found in the file, if any.
    pub exported_at: Option<NaiveDateTime>,
    pub source: Option<PathBuf>,
    /// SHA-256 of the decoded file content.
    pub digest: Option<String>,
}

/// Derived rows ready for filtering, aggregation and rendering.
#[derive(Debug, Clone)]
pub struct ProjectTable {
    pub rows: Vec<DerivedRecord>,
    pub columns: BTreeSet<Column>,
    pub exported_at: Option<NaiveDateTime>,
    pub source: Option<PathBuf>,
    pub digest: Option<String>,
    /// Reference date the derived fields were computed against.
    pub today: NaiveDate,
}

impl ProjectTable {
    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Same metadata, different rows.
    pub fn with_rows(&self, rows: Vec<DerivedRecord>) -> ProjectTable {
        ProjectTable {
            rows,
            columns: self.columns.clone(),
            exported_at: self.exported_at,
            source: self.source.clone(),
            digest: self.digest.clone(),
            today: self.today,
        }
    }

    /// Sorted distinct raw states, as offered by state pickers.
    pub fn distinct_states(&self) -> Vec<String> {
        let set: BTreeSet<&str> = self.rows.iter().map(|r| r.record.state.as_str()).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Sorted distinct non-null values of a text column.
    pub fn distinct_values(&self, column: Column) -> Vec<String> {
        let set: BTreeSet<&str> =
            self.rows.iter().filter_map(|r| r.record.text(column)).collect();
        set.into_iter().map(str::to_string).collect()
    }

    /// Stable sort by one column; nulls always last.
    pub fn sort_by_column(&mut self, column: Column, ascending: bool) {
        self.rows.sort_by(|a, b| {
            let (x, y) = (a.cell(column), b.cell(column));
            match (x.is_null(), y.is_null()) {
                (false, false) if !ascending => y.sort_cmp(&x),
                _ => x.sort_cmp(&y),
            }
        });
    }
}
