//! Plain-text terminal views: the dashboard summary and the project table.

use console::style;
use std::fmt::Write as _;

use super::report::ReportData;
use crate::aggregate::CategoryCount;
use crate::domain::{Column, DerivedRecord, Status};
use crate::utils::{display_width, format_with_commas, pad_right, truncate_to_width};

/// Widest a free-text column may grow in the table view.
const MAX_CELL_WIDTH: usize = 40;

fn paint(text: &str, status: Option<&Status>, color: bool) -> String {
    let styled = style(text).force_styling(color);
    let styled = match status {
        Some(Status::Overdue) => styled.red().bold(),
        Some(Status::AttentionNeeded) => styled.yellow(),
        Some(Status::OnTrack) => styled.green(),
        Some(Status::WaitingForFirewall) => styled.magenta(),
        Some(Status::PendingSiteUpdates) => styled.cyan(),
        Some(Status::NoKickoffDate) => styled.dim(),
        _ => styled,
    };
    styled.to_string()
}

fn heading(out: &mut String, title: &str, color: bool) {
    let _ = writeln!(out, "\n{}", style(title).force_styling(color).bold().underlined());
}

/// `status_labels` marks a block whose labels are statuses and get painted.
fn count_block(
    out: &mut String,
    title: &str,
    counts: &[CategoryCount],
    status_labels: bool,
    color: bool,
) {
    if counts.is_empty() {
        return;
    }
    heading(out, title, color);
    let width = counts.iter().map(|c| display_width(&c.label)).max().unwrap_or(0);
    for c in counts {
        let padded = pad_right(&c.label, width);
        let label = if status_labels {
            paint(&padded, Some(&Status::from_label(&c.label)), color)
        } else {
            paint(&padded, None, color)
        };
        let _ = writeln!(out, "  {label}  {:>5}", format_with_commas(c.count));
    }
}

fn days(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_else(|| "n/a".to_string())
}

/// Multi-section dashboard for `report --format text`.
pub fn render_dashboard(data: &ReportData, color: bool) -> String {
    let mut out = String::new();
    let m = &data.metrics;

    let _ = writeln!(
        out,
        "{} {} of {} projects (as of {})",
        style("Design Tracker").force_styling(color).bold(),
        format_with_commas(data.matched),
        format_with_commas(data.source.rows),
        data.today
    );
    if let Some(at) = data.source.exported_at {
        let _ = writeln!(out, "Last export: {}", at.format("%Y-%m-%d %H:%M"));
    }

    heading(&mut out, "Key metrics", color);
    let rows = [
        ("Active Design Projects", m.active_design),
        ("Waiting on Firewall", m.waiting_on_firewall),
        ("Pending Site Updates", m.pending_site_updates),
        ("Overdue Design", m.overdue_design),
        ("Urgent Design", m.urgent_design),
        ("Awaiting Kickoff", m.awaiting_kickoff),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {}  {:>5}", pad_right(label, 24), format_with_commas(value));
    }

    let perf = &data.performance;
    heading(
        &mut out,
        &format!("Recent performance (last {} months)", perf.window_months),
        color,
    );
    if perf.summary.projects == 0 {
        let _ = writeln!(out, "  No completed projects in window");
    } else {
        let s = &perf.summary;
        let _ = writeln!(out, "  {}  {:>7}", pad_right("Avg days: kickoff -> testing info", 36), days(s.avg_days_to_testing_info));
        let _ = writeln!(out, "  {}  {:>7}", pad_right("Avg days: kickoff -> completion", 36), days(s.avg_days_to_completion));
        let _ = writeln!(
            out,
            "  {}  {:>6.1}% ({}/{})",
            pad_right("SLA met rate", 36),
            s.sla.rate,
            s.sla.compliant,
            s.sla.measured
        );
        let _ = writeln!(out, "  {}  {:>7}", pad_right("Measured span", 36), perf.span);
        for point in perf.trend.iter().filter(|p| p.rate.has_data()) {
            let _ = writeln!(
                out,
                "    {}  {:>6.1}% ({}/{})",
                point.month, point.rate.rate, point.rate.compliant, point.rate.measured
            );
        }
    }

    let counts = &data.counts;
    count_block(&mut out, "By status", &counts.status, true, color);
    count_block(&mut out, "By state", &counts.effective_state, false, color);
    count_block(&mut out, "By engineer", &counts.engineer, false, color);
    count_block(&mut out, "By market area", &counts.market_area, false, color);
    count_block(&mut out, "By CE division", &counts.division, false, color);
    for extra in &counts.breakdowns {
        count_block(&mut out, &format!("By {}", extra.dimension), &extra.counts, false, color);
    }

    out
}

/// Aligned table of `columns` for `list --format table`.
pub fn render_table(rows: &[DerivedRecord], columns: &[Column], color: bool) -> String {
    if rows.is_empty() {
        return "No projects match the current filters\n".to_string();
    }

    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| {
                    let flat = row.cell(*c).render().replace(['\n', '\r'], " ");
                    truncate_to_width(&flat, MAX_CELL_WIDTH)
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| display_width(&r[i]))
                .chain(std::iter::once(display_width(c.header())))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> =
        columns.iter().zip(&widths).map(|(c, w)| pad_right(c.header(), *w)).collect();
    let _ = writeln!(out, "{}", style(header.join("  ").trim_end()).force_styling(color).bold());
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));

    let last = columns.len().saturating_sub(1);
    for (row, values) in rows.iter().zip(&cells) {
        let line: Vec<String> = columns
            .iter()
            .zip(values)
            .zip(&widths)
            .enumerate()
            .map(|(i, ((column, value), width))| {
                // The last column is left unpadded so styling never hides trailing spaces.
                let text = if i == last { value.clone() } else { pad_right(value, *width) };
                if *column == Column::Status && !value.is_empty() {
                    paint(&text, Some(row.status()), color)
                } else {
                    text
                }
            })
            .collect();
        let _ = writeln!(out, "{}", line.join("  ").trim_end());
    }
    let _ = writeln!(out, "\n{} projects", format_with_commas(rows.len()));
    out
}
