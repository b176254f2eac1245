//! Whole-table statistics: category counts, SLA compliance, dashboard metrics.
//!
//! Aggregators never exclude rows on their own; callers narrow the table
//! with [`crate::filter`] first when a view needs "active only" semantics.

use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Column, DerivedRecord, LabelMap, UNASSIGNED_LABEL};

pub mod compliance;
pub mod metrics;

pub use compliance::{
    compliance, compliance_by, monthly_trend, ComplianceRate, GroupCompliance, Span, TrendPoint,
};
pub use metrics::{
    dashboard_metrics, engineer_status_pivot, mean, performance_summary, performance_window,
    DashboardMetrics, PerformanceSummary,
};

/// A grouping dimension for counts and per-group compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Dimension {
    Status,
    State,
    EffectiveState,
    Engineer,
    ServiceArea,
    /// Service area rolled up through the market-area map.
    MarketArea,
    ServiceLine,
    Division,
    Priority,
    Facility,
}

impl Dimension {
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Status => "Status",
            Dimension::State => "Project State",
            Dimension::EffectiveState => "Effective State",
            Dimension::Engineer => "Design Engineer",
            Dimension::ServiceArea => "Service Area",
            Dimension::MarketArea => "Market Area",
            Dimension::ServiceLine => "Service Line",
            Dimension::Division => "CE Division",
            Dimension::Priority => "Priority",
            Dimension::Facility => "Facility",
        }
    }

    fn column(self) -> Column {
        match self {
            Dimension::Status => Column::Status,
            Dimension::State | Dimension::EffectiveState => Column::ProjectState,
            Dimension::Engineer => Column::DesignEngineer,
            Dimension::ServiceArea | Dimension::MarketArea => Column::ServiceArea,
            Dimension::ServiceLine => Column::ServiceLine,
            Dimension::Division => Column::Division,
            Dimension::Priority => Column::Priority,
            Dimension::Facility => Column::Facility,
        }
    }

    /// Group label of a row; blanks fall into [`UNASSIGNED_LABEL`].
    pub fn value_of(self, row: &DerivedRecord, market_areas: &LabelMap) -> String {
        let value = match self {
            Dimension::Status => Some(row.status().label()),
            Dimension::EffectiveState => Some(row.effective_state.as_str()),
            Dimension::MarketArea => row.record.service_area.as_deref().map(|a| market_areas.resolve(a)),
            other => row.record.text(other.column()),
        };
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => UNASSIGNED_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

/// Row counts per group, largest first, ties by label.
pub fn count_by(
    rows: &[DerivedRecord],
    dimension: Dimension,
    market_areas: &LabelMap,
) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(dimension.value_of(row, market_areas)).or_default() += 1;
    }
    let mut out: Vec<CategoryCount> =
        counts.into_iter().map(|(label, count)| CategoryCount { label, count }).collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::derive::Deriver;
    use crate::domain::{DerivedRecord, LabelMap, ProjectRecord, SlaPolicy};
    use chrono::NaiveDate;

    pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).expect("valid date")
    }

    pub fn derive_all(today: NaiveDate, records: Vec<ProjectRecord>) -> Vec<DerivedRecord> {
        let deriver = Deriver::new(
            today,
            SlaPolicy::default(),
            LabelMap::new(LabelMap::default_state_rules()),
        );
        records.into_iter().map(|r| deriver.derive_record(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{d, derive_all};
    use super::*;
    use crate::domain::ProjectRecord;

    fn rows() -> Vec<DerivedRecord> {
        let mut records = vec![
            ProjectRecord::new("1", "Design"),
            ProjectRecord::new("2", "Design"),
            ProjectRecord::new("3", "Security"),
            ProjectRecord::new("4", "Complete"),
            ProjectRecord::new("5", "Hold"),
        ];
        records[0].service_area = Some("Imaging-RAD".to_string());
        records[1].service_area = Some("Imaging-Cardio".to_string());
        records[2].service_area = Some("Lab-POC".to_string());
        records[3].service_area = Some("  ".to_string());
        derive_all(d(2025, 8, 20), records)
    }

    #[test]
    fn counts_by_effective_state_merge_remapped_labels() {
        let counts = count_by(&rows(), Dimension::EffectiveState, &LabelMap::default());
        assert_eq!(counts[0], CategoryCount { label: "Complete".to_string(), count: 2 });
        assert_eq!(counts[1], CategoryCount { label: "Design".to_string(), count: 2 });
        assert_eq!(counts[2], CategoryCount { label: "Hold".to_string(), count: 1 });
    }

    #[test]
    fn counts_by_raw_state_keep_labels_apart() {
        let counts = count_by(&rows(), Dimension::State, &LabelMap::default());
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn market_area_rollup_and_unassigned_bucket() {
        let areas = LabelMap::new(LabelMap::default_service_area_groups());
        let counts = count_by(&rows(), Dimension::MarketArea, &areas);
        assert_eq!(
            counts,
            vec![
                CategoryCount { label: "Imaging".to_string(), count: 2 },
                CategoryCount { label: "Unassigned".to_string(), count: 2 },
                CategoryCount { label: "Lab".to_string(), count: 1 },
            ]
        );
    }

    #[test]
    fn status_counts_include_every_row() {
        let counts = count_by(&rows(), Dimension::Status, &LabelMap::default());
        let total: usize = counts.iter().map(|c| c.count).sum();
        assert_eq!(total, 5);
    }
}
