//! SLA compliance rates and monthly trends.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeMap;

use super::Dimension;
use crate::derive::dates::{month_start, next_month};
use crate::domain::{is_placeholder, Cell, Column, DerivedRecord, LabelMap};

/// Elapsed time measured against the SLA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Span {
    /// Kickoff to testing info sent.
    TestingInfo,
    /// Kickoff to go-live.
    Completion,
}

impl Span {
    pub fn days(self, row: &DerivedRecord) -> Option<i64> {
        match self {
            Span::TestingInfo => row.derived.days_to_testing_info,
            Span::Completion => row.derived.days_to_completion,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Span::TestingInfo => "Kickoff to Testing Info",
            Span::Completion => "Kickoff to Completion",
        }
    }
}

/// Share of measured rows within the SLA.
///
/// `measured` is carried alongside the rate so that "0% of nothing" and
/// "0% of ten" stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComplianceRate {
    pub compliant: usize,
    pub measured: usize,
    /// Percentage; 0 when nothing was measured.
    pub rate: f64,
}

impl ComplianceRate {
    pub fn from_counts(compliant: usize, measured: usize) -> Self {
        let rate = if measured == 0 { 0.0 } else { compliant as f64 / measured as f64 * 100.0 };
        Self { compliant, measured, rate }
    }

    pub fn has_data(&self) -> bool {
        self.measured > 0
    }
}

pub fn compliance<'a>(
    rows: impl IntoIterator<Item = &'a DerivedRecord>,
    span: Span,
    sla_days: i64,
) -> ComplianceRate {
    let (mut compliant, mut measured) = (0, 0);
    for days in rows.into_iter().filter_map(|row| span.days(row)) {
        measured += 1;
        if days <= sla_days {
            compliant += 1;
        }
    }
    ComplianceRate::from_counts(compliant, measured)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupCompliance {
    pub label: String,
    #[serde(flatten)]
    pub rate: ComplianceRate,
}

/// Compliance computed independently per group, groups in label order.
pub fn compliance_by(
    rows: &[DerivedRecord],
    span: Span,
    sla_days: i64,
    dimension: Dimension,
    market_areas: &LabelMap,
) -> Vec<GroupCompliance> {
    let mut groups: BTreeMap<String, Vec<&DerivedRecord>> = BTreeMap::new();
    for row in rows {
        groups.entry(dimension.value_of(row, market_areas)).or_default().push(row);
    }
    groups
        .into_iter()
        .map(|(label, members)| GroupCompliance { label, rate: compliance(members, span, sla_days) })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM`.
    pub month: String,
    #[serde(flatten)]
    pub rate: ComplianceRate,
}

/// Compliance per calendar month of `month_column`.
///
/// Every month between the first and last one present gets a point, so
/// gaps show up as 0% with `measured == 0`. Rows without a real date in
/// `month_column` cannot be placed and are skipped.
pub fn monthly_trend(
    rows: &[DerivedRecord],
    month_column: Column,
    span: Span,
    sla_days: i64,
) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&DerivedRecord>> = BTreeMap::new();
    for row in rows {
        if let Cell::Date(date) = row.cell(month_column) {
            if !is_placeholder(date) {
                buckets.entry(month_start(date)).or_default().push(row);
            }
        }
    }

    let (Some(first), Some(last)) =
        (buckets.keys().next().copied(), buckets.keys().next_back().copied())
    else {
        return Vec::new();
    };

    let mut points = Vec::new();
    let mut month = first;
    while month <= last {
        let members = buckets.get(&month).map(Vec::as_slice).unwrap_or(&[]);
        points.push(TrendPoint {
            month: month.format("%Y-%m").to_string(),
            rate: compliance(members.iter().copied(), span, sla_days),
        });
        month = next_month(month);
    }
    points
}
