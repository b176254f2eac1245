//! JSONL rendering, one object per row.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::{Cell, Column, DerivedRecord};

fn cell_value(cell: Cell<'_>) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Int(n) => Value::Number(n.into()),
        Cell::Text(s) => Value::String(s.to_string()),
        Cell::Date(_) => Value::String(cell.render()),
    }
}

pub fn render_jsonl(rows: &[DerivedRecord], columns: &[Column]) -> String {
    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        // Keys serialize in alphabetical order.
        let mut entry: BTreeMap<&str, Value> = BTreeMap::new();
        for column in columns {
            entry.insert(column.key(), cell_value(row.cell(*column)));
        }
        entry.insert("effective-state", Value::String(row.effective_state.clone()));

        if let Ok(line) = serde_json::to_string(&entry) {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::test_support::{d, derive_all};
    use crate::domain::ProjectRecord;

    #[test]
    fn rows_become_sorted_objects() {
        let rows = derive_all(
            d(2025, 8, 15),
            vec![ProjectRecord { kickoff: Some(d(2025, 8, 1)), ..ProjectRecord::new("1001", "Design") }],
        );
        let out = render_jsonl(&rows, &[Column::Status, Column::DefectId, Column::DaysSinceKickoff, Column::GoLiveDate]);
        assert_eq!(
            out,
            "{\"days-since-kickoff\":14,\"defect-id\":\"1001\",\"effective-state\":\"Design\",\"go-live-date\":null,\"status\":\"On Track\"}\n"
        );
    }

    #[test]
    fn no_rows_is_empty_output() {
        assert_eq!(render_jsonl(&[], &Column::OVERVIEW), "");
    }
}
