//! CSV output for snapshots, filtered views and the performance extract.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::io::Write;
use std::path::Path;

use crate::domain::{Column, DerivedRecord, EXPORT_DATE_HEADER, EXPORT_SOURCE_HEADER};

/// Column layout of the performance extract.
pub const PERFORMANCE_COLUMNS: [Column; 7] = [
    Column::DesignEngineer,
    Column::DefectId,
    Column::KickoffDate,
    Column::TestingInfoSent,
    Column::GoLiveDate,
    Column::DaysToTestingInfo,
    Column::DaysToCompletion,
];

/// Export metadata appended to every row.
#[derive(Debug, Clone)]
pub struct ExportStamp {
    pub exported_at: NaiveDateTime,
    pub source: String,
}

impl ExportStamp {
    fn date_text(&self) -> String {
        self.exported_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Source columns followed by derived columns.
pub fn snapshot_columns() -> Vec<Column> {
    Column::all().collect()
}

pub fn write_csv<W: Write>(
    writer: W,
    rows: &[DerivedRecord],
    columns: &[Column],
    stamp: Option<&ExportStamp>,
) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);

    let mut header: Vec<&str> = columns.iter().map(|c| c.header()).collect();
    if stamp.is_some() {
        header.extend([EXPORT_DATE_HEADER, EXPORT_SOURCE_HEADER]);
    }
    out.write_record(&header)?;

    let stamp_fields = stamp.map(|s| [s.date_text(), s.source.clone()]);
    for row in rows {
        let mut fields: Vec<String> = columns.iter().map(|c| row.cell(*c).render()).collect();
        if let Some(extra) = &stamp_fields {
            fields.extend(extra.iter().cloned());
        }
        out.write_record(&fields)?;
    }
    out.flush()?;
    Ok(())
}

pub fn render_csv(rows: &[DerivedRecord], columns: &[Column]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, rows, columns, None)?;
    String::from_utf8(buf).context("CSV output was not valid UTF-8")
}

pub fn write_csv_file(
    path: &Path,
    rows: &[DerivedRecord],
    columns: &[Column],
    stamp: Option<&ExportStamp>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_csv(std::io::BufWriter::new(file), rows, columns, stamp)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::{d, derive_all};
    use crate::domain::{placeholder_date, ProjectRecord};

    #[test]
    fn writes_header_cells_and_stamp() {
        let rows = derive_all(
            d(2025, 8, 15),
            vec![ProjectRecord {
                kickoff: Some(d(2025, 8, 1)),
                comments: Some("a, \"quoted\"\nnote".to_string()),
                ..ProjectRecord::new("1001", "Design")
            }],
        );
        let stamp = ExportStamp {
            exported_at: d(2025, 8, 15).and_hms_opt(8, 0, 0).unwrap(),
            source: "host-1".to_string(),
        };
        let mut buf = Vec::new();
        write_csv(
            &mut buf,
            &rows,
            &[Column::DefectId, Column::Comments, Column::ExpectedCompletion, Column::DaysUntilSla],
            Some(&stamp),
        )
        .unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Defect ID,Comments,Expected DE Completion,Days Until SLA,Export Date,Export Source")
        );
        assert!(text.contains("\"a, \"\"quoted\"\"\nnote\""));
        assert!(text.contains(",2025-08-22,7,2025-08-15 08:00:00,host-1"));
    }

    #[test]
    fn nulls_are_empty_and_placeholder_is_kept() {
        let rows = derive_all(
            d(2025, 8, 15),
            vec![ProjectRecord { kickoff: Some(placeholder_date()), ..ProjectRecord::new("7", "Intake") }],
        );
        let text = render_csv(&rows, &[Column::DefectId, Column::KickoffDate, Column::DaysSinceKickoff]).unwrap();
        assert_eq!(text, "Defect ID,Kick-Off Date,Days Since Kickoff\n7,1900-01-01,\n");
    }
}
