//! Dashboard headline numbers and completed-project performance.

use chrono::{Months, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::compliance::{compliance, ComplianceRate, Span};
use super::Dimension;
use crate::domain::state::{COMPLETE, DESIGN, FIREWALL, INTAKE, TESTING};
use crate::domain::{is_placeholder, valid_anchor, DerivedRecord, LabelMap, SlaPolicy, Status};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardMetrics {
    pub total: usize,
    /// Intake projects still carrying the placeholder kickoff.
    pub awaiting_kickoff: usize,
    pub active_design: usize,
    pub waiting_on_firewall: usize,
    pub pending_site_updates: usize,
    pub overdue_design: usize,
    /// Design projects with `days_until_sla` at or below the urgent threshold.
    pub urgent_design: usize,
}

pub fn dashboard_metrics(rows: &[DerivedRecord], policy: &SlaPolicy) -> DashboardMetrics {
    let mut metrics = DashboardMetrics { total: rows.len(), ..DashboardMetrics::default() };
    for row in rows {
        match row.effective_state.as_str() {
            DESIGN => {
                metrics.active_design += 1;
                if *row.status() == Status::Overdue {
                    metrics.overdue_design += 1;
                }
                if row.derived.days_until_sla.is_some_and(|d| d <= policy.urgent_days) {
                    metrics.urgent_design += 1;
                }
            }
            FIREWALL => metrics.waiting_on_firewall += 1,
            TESTING => metrics.pending_site_updates += 1,
            INTAKE if row.record.kickoff.is_some_and(is_placeholder) => {
                metrics.awaiting_kickoff += 1
            }
            _ => {}
        }
    }
    metrics
}

/// Arithmetic mean, `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = i64>) -> Option<f64> {
    let (sum, count) = values.into_iter().fold((0i64, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

/// Completed projects with a real kickoff and testing-info date whose
/// kickoff falls within the last `months` months of `today`.
pub fn performance_window(rows: &[DerivedRecord], today: NaiveDate, months: u32) -> Vec<DerivedRecord> {
    let cutoff = today.checked_sub_months(Months::new(months)).unwrap_or(NaiveDate::MIN);
    rows.iter()
        .filter(|row| row.effective_state == COMPLETE)
        .filter(|row| valid_anchor(row.record.testing_info_sent).is_some())
        .filter(|row| valid_anchor(row.record.kickoff).is_some_and(|k| k >= cutoff))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub projects: usize,
    pub avg_days_to_testing_info: Option<f64>,
    pub avg_days_to_completion: Option<f64>,
    /// Kickoff to testing info within the SLA.
    pub sla: ComplianceRate,
}

pub fn performance_summary(rows: &[DerivedRecord], span: Span, sla_days: i64) -> PerformanceSummary {
    PerformanceSummary {
        projects: rows.len(),
        avg_days_to_testing_info: mean(rows.iter().filter_map(|r| r.derived.days_to_testing_info)),
        avg_days_to_completion: mean(rows.iter().filter_map(|r| r.derived.days_to_completion)),
        sla: compliance(rows, span, sla_days),
    }
}

/// Row counts per engineer, then per status label.
pub fn engineer_status_pivot(rows: &[DerivedRecord]) -> BTreeMap<String, BTreeMap<String, usize>> {
    let plain = LabelMap::default();
    let mut pivot: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for row in rows {
        let engineer = Dimension::Engineer.value_of(row, &plain);
        *pivot
            .entry(engineer)
            .or_default()
            .entry(row.status().label().to_string())
            .or_default() += 1;
    }
    pivot
}
