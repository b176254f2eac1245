//! Report assembly and JSON output.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use crate::aggregate::{
    compliance_by, count_by, dashboard_metrics, engineer_status_pivot, monthly_trend,
    performance_summary, performance_window, CategoryCount, DashboardMetrics, Dimension,
    GroupCompliance, PerformanceSummary, Span, TrendPoint,
};
use crate::domain::{Column, Config, ProjectTable, REPORT_SCHEMA_VERSION};
use crate::filter::FilterConfig;

#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub path: Option<String>,
    pub digest: Option<String>,
    pub exported_at: Option<NaiveDateTime>,
    pub rows: usize,
}

/// Counts over one extra dimension requested with `report --by`.
#[derive(Debug, Clone, Serialize)]
pub struct Breakdown {
    pub dimension: &'static str,
    pub counts: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Counts {
    pub status: Vec<CategoryCount>,
    pub effective_state: Vec<CategoryCount>,
    pub engineer: Vec<CategoryCount>,
    pub market_area: Vec<CategoryCount>,
    pub division: Vec<CategoryCount>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub breakdowns: Vec<Breakdown>,
}

/// Knobs of the report that are not filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Span measured against the SLA in the performance section.
    pub span: Span,
    pub breakdowns: Vec<Dimension>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { span: Span::TestingInfo, breakdowns: Vec::new() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Performance {
    pub window_months: u32,
    pub span: &'static str,
    pub summary: PerformanceSummary,
    pub by_engineer: Vec<GroupCompliance>,
    pub trend: Vec<TrendPoint>,
}

/// A filtered project overview: dashboard numbers and counts over the
/// matching rows, plus recent performance over the whole snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub today: NaiveDate,
    pub source: SourceInfo,
    pub filters: Value,
    pub matched: usize,
    pub metrics: DashboardMetrics,
    pub counts: Counts,
    pub engineer_status: BTreeMap<String, BTreeMap<String, usize>>,
    pub performance: Performance,
}

impl ReportData {
    pub fn compute(
        full: &ProjectTable,
        filtered: &ProjectTable,
        filter: &FilterConfig,
        config: &Config,
        options: &ReportOptions,
    ) -> Self {
        let areas = config.service_area_map();
        let rows = &filtered.rows;
        let sla_days = config.sla.sla_days;
        let span = options.span;

        let window = performance_window(&full.rows, full.today, config.performance_window_months);

        ReportData {
            today: full.today,
            source: SourceInfo {
                path: full.source.as_ref().map(|p| p.display().to_string()),
                digest: full.digest.clone(),
                exported_at: full.exported_at,
                rows: full.len(),
            },
            filters: filter.describe(),
            matched: filtered.len(),
            metrics: dashboard_metrics(rows, &config.sla),
            counts: Counts {
                status: count_by(rows, Dimension::Status, &areas),
                effective_state: count_by(rows, Dimension::EffectiveState, &areas),
                engineer: count_by(rows, Dimension::Engineer, &areas),
                market_area: count_by(rows, Dimension::MarketArea, &areas),
                division: count_by(rows, Dimension::Division, &areas),
                breakdowns: options
                    .breakdowns
                    .iter()
                    .map(|dim| Breakdown { dimension: dim.label(), counts: count_by(rows, *dim, &areas) })
                    .collect(),
            },
            engineer_status: engineer_status_pivot(rows),
            performance: Performance {
                window_months: config.performance_window_months,
                span: span.label(),
                summary: performance_summary(&window, span, sla_days),
                by_engineer: compliance_by(&window, span, sla_days, Dimension::Engineer, &areas),
                trend: monthly_trend(&window, Column::KickoffDate, span, sla_days),
            },
        }
    }
}

/// JSON document for `report --format json`.
pub fn report_json(data: &ReportData, include_timestamp: bool) -> Result<Value> {
    let mut report = Map::new();
    report.insert("schema_version".to_string(), Value::String(REPORT_SCHEMA_VERSION.to_string()));
    if include_timestamp {
        report.insert(
            "generated_at".to_string(),
            Value::String(Utc::now().format("%Y-%m-%dT%H:%M:%S+00:00").to_string()),
        );
    }
    if let Value::Object(body) = serde_json::to_value(data)? {
        report.extend(body);
    }
    Ok(Value::Object(report))
}

pub fn write_report(report_path: &Path, data: &ReportData, include_timestamp: bool) -> Result<()> {
    let report = report_json(data, include_timestamp)?;
    if let Some(parent) = report_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(report_path, serde_json::to_string_pretty(&report)?)?;
    Ok(())
}
