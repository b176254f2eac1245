//! CSV snapshot reader.

use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, warn};

use super::IngestError;
use crate::derive::{parse_date, parse_datetime};
use crate::domain::{Column, ProjectRecord, Snapshot, EXPORT_DATE_HEADER};
use crate::utils::encoding::decode_bytes;
use crate::utils::hashing::content_digest;

const DIGEST_LEN: usize = 16;

enum Slot {
    Source(Column),
    ExportDate,
    Ignored,
}

/// Read and parse a snapshot file.
pub fn load_snapshot(path: &Path) -> Result<Snapshot, IngestError> {
    let bytes = std::fs::read(path)
        .map_err(|source| IngestError::Io { path: path.display().to_string(), source })?;
    let (text, encoding) = decode_bytes(&bytes, None);
    debug!(path = %path.display(), encoding = %encoding, bytes = bytes.len(), "read snapshot");

    let mut snapshot = parse_snapshot(&text).map_err(|err| match err {
        IngestError::Csv { source, .. } => {
            IngestError::Csv { path: path.display().to_string(), source }
        }
        IngestError::EmptySnapshot { .. } => {
            IngestError::EmptySnapshot { path: path.display().to_string() }
        }
        other => other,
    })?;
    snapshot.source = Some(path.to_path_buf());
    Ok(snapshot)
}

/// Parse snapshot CSV text.
///
/// Headers are matched case-insensitively. Derived columns in the file are
/// ignored since they are recomputed on every load. Unknown columns are
/// skipped. Dates that do not parse become null.
pub fn parse_snapshot(text: &str) -> Result<Snapshot, IngestError> {
    let csv_error = |source| IngestError::Csv { path: "<input>".to_string(), source };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::EmptySnapshot { path: "<input>".to_string() });
    }
    let mut columns = BTreeSet::new();
    let slots: Vec<Slot> = headers
        .iter()
        .map(|header| match Column::from_header(header) {
            Some(column) if !column.is_derived() => {
                columns.insert(column);
                Slot::Source(column)
            }
            Some(_) => Slot::Ignored,
            None if header.eq_ignore_ascii_case(EXPORT_DATE_HEADER) => Slot::ExportDate,
            None => {
                debug!(header, "ignoring unknown column");
                Slot::Ignored
            }
        })
        .collect();

    for required in [Column::DefectId, Column::ProjectState] {
        if !columns.contains(&required) {
            return Err(IngestError::MissingColumn(required.header()));
        }
    }

    let mut records = Vec::new();
    let mut exported_at = None;
    let mut unparsed_dates = 0usize;

    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let mut record = ProjectRecord::default();
        for (slot, value) in slots.iter().zip(row.iter()) {
            match slot {
                Slot::Source(column) => {
                    if assign(&mut record, *column, value) {
                        unparsed_dates += 1;
                    }
                }
                Slot::ExportDate => {
                    if let Some(at) = parse_datetime(value) {
                        exported_at = exported_at.max(Some(at));
                    }
                }
                Slot::Ignored => {}
            }
        }
        records.push(record);
    }

    if unparsed_dates > 0 {
        warn!(count = unparsed_dates, "some date values could not be parsed and were treated as missing");
    }
    debug!(rows = records.len(), columns = columns.len(), "parsed snapshot");

    Ok(Snapshot {
        records,
        columns,
        exported_at,
        source: None,
        digest: Some(content_digest(text.as_bytes(), DIGEST_LEN)),
    })
}

/// Store one cell; returns true when a non-blank date failed to parse.
fn assign(record: &mut ProjectRecord, column: Column, raw: &str) -> bool {
    match column {
        Column::DefectId => record.defect_id = raw.trim().to_string(),
        Column::ProjectState => record.state = raw.trim().to_string(),
        _ if column.is_date() => {
            let parsed = parse_date(raw);
            if let Some(slot) = record.date_mut(column) {
                *slot = parsed;
            }
            return parsed.is_none() && !raw.trim().is_empty();
        }
        _ => {
            if let Some(slot) = record.text_mut(column) {
                *slot = (!raw.trim().is_empty()).then(|| raw.to_string());
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::placeholder_date;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Design Engineer,Defect ID,Project State,Kick-Off Date,Status,Comments,Export Date,Mystery
Avery,1001,Design,2025-08-01 00:00:00,Overdue,\"line one
line two\",2025-08-20 10:00:00,x
,1002,Intake,1900-01-01,,,2025-08-21 09:30:00,y
Blake,1003,Firewall,not a date,,,,
";

    #[test]
    fn parses_known_columns_and_dates() {
        let snapshot = parse_snapshot(SAMPLE).unwrap();
        assert_eq!(snapshot.records.len(), 3);

        let first = &snapshot.records[0];
        assert_eq!(first.defect_id, "1001");
        assert_eq!(first.design_engineer.as_deref(), Some("Avery"));
        assert_eq!(first.kickoff, NaiveDate::from_ymd_opt(2025, 8, 1));
        assert_eq!(first.comments.as_deref(), Some("line one\nline two"));

        assert_eq!(snapshot.records[1].design_engineer, None);
        assert_eq!(snapshot.records[1].kickoff, Some(placeholder_date()));
        assert_eq!(snapshot.records[2].kickoff, None);
    }

    #[test]
    fn derived_and_unknown_columns_are_not_recorded() {
        let snapshot = parse_snapshot(SAMPLE).unwrap();
        assert!(snapshot.columns.contains(&Column::KickoffDate));
        assert!(!snapshot.columns.contains(&Column::Status));
        assert!(!snapshot.columns.contains(&Column::GoLiveDate));
    }

    #[test]
    fn export_date_keeps_the_latest_value() {
        let snapshot = parse_snapshot(SAMPLE).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 8, 21).unwrap().and_hms_opt(9, 30, 0);
        assert_eq!(snapshot.exported_at, expected);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = parse_snapshot("Defect ID,Design Engineer\n1,Avery\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn("Project State")));
    }

    #[test]
    fn file_without_header_is_empty_not_malformed() {
        assert!(matches!(parse_snapshot(""), Err(IngestError::EmptySnapshot { .. })));
        assert!(matches!(parse_snapshot("\n\n"), Err(IngestError::EmptySnapshot { .. })));
        let header_only = parse_snapshot("Defect ID,Project State\n").unwrap();
        assert!(header_only.records.is_empty());
    }

    #[test]
    fn headers_match_case_insensitively() {
        let snapshot = parse_snapshot(" defect id , PROJECT STATE\n7,Hold\n").unwrap();
        assert_eq!(snapshot.records[0].state, "Hold");
    }

    #[test]
    fn load_records_source_and_digest() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xef, 0xbb, 0xbf]).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        file.flush().unwrap();

        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.source.as_deref(), Some(file.path()));
        assert_eq!(snapshot.digest.as_ref().map(String::len), Some(16));
        assert_eq!(snapshot.records[0].design_engineer.as_deref(), Some("Avery"));
    }
}
