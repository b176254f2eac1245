//! Snapshot columns and typed cell values.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A known column of the project snapshot, source or derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    DefectId,
    ProjectState,
    DesignEngineer,
    Priority,
    ServiceArea,
    ServiceLine,
    Division,
    Facility,
    Opw,
    NumberOfDevices,
    AsaAssigned,
    KickoffDate,
    TestingInfoSent,
    GoLiveDate,
    Comments,
    FacilityUpdates,
    DaysSinceKickoff,
    ExpectedCompletion,
    Status,
    DaysUntilSla,
    DaysToTestingInfo,
    DaysToCompletion,
}

impl Column {
    /// Columns read from the upstream snapshot, in export order.
    pub const SOURCE: [Column; 16] = [
        Column::DesignEngineer,
        Column::DefectId,
        Column::Priority,
        Column::ServiceArea,
        Column::Facility,
        Column::ProjectState,
        Column::ServiceLine,
        Column::Division,
        Column::KickoffDate,
        Column::Opw,
        Column::NumberOfDevices,
        Column::FacilityUpdates,
        Column::AsaAssigned,
        Column::Comments,
        Column::TestingInfoSent,
        Column::GoLiveDate,
    ];

    /// Columns computed by the deriver, in export order.
    pub const DERIVED: [Column; 6] = [
        Column::DaysSinceKickoff,
        Column::ExpectedCompletion,
        Column::Status,
        Column::DaysUntilSla,
        Column::DaysToTestingInfo,
        Column::DaysToCompletion,
    ];

    /// Default columns of the `list` table view.
    pub const OVERVIEW: [Column; 9] = [
        Column::DefectId,
        Column::Opw,
        Column::DesignEngineer,
        Column::ProjectState,
        Column::KickoffDate,
        Column::ExpectedCompletion,
        Column::DaysSinceKickoff,
        Column::TestingInfoSent,
        Column::Status,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Column::DefectId => "Defect ID",
            Column::ProjectState => "Project State",
            Column::DesignEngineer => "Design Engineer",
            Column::Priority => "Priority",
            Column::ServiceArea => "Service Area",
            Column::ServiceLine => "Service Line",
            Column::Division => "CE Division",
            Column::Facility => "Facility",
            Column::Opw => "OPW",
            Column::NumberOfDevices => "Number of Devices",
            Column::AsaAssigned => "ASA Assigned",
            Column::KickoffDate => "Kick-Off Date",
            Column::TestingInfoSent => "Testing Info Sent",
            Column::GoLiveDate => "Actual Go-Live Date",
            Column::Comments => "Comments",
            Column::FacilityUpdates => "Facility Updates",
            Column::DaysSinceKickoff => "Days Since Kickoff",
            Column::ExpectedCompletion => "Expected DE Completion",
            Column::Status => "Status",
            Column::DaysUntilSla => "Days Until SLA",
            Column::DaysToTestingInfo => "Days to Testing Info Sent",
            Column::DaysToCompletion => "Days to Completion",
        }
    }

    /// Kebab-case key used on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Column::DefectId => "defect-id",
            Column::ProjectState => "project-state",
            Column::DesignEngineer => "design-engineer",
            Column::Priority => "priority",
            Column::ServiceArea => "service-area",
            Column::ServiceLine => "service-line",
            Column::Division => "division",
            Column::Facility => "facility",
            Column::Opw => "opw",
            Column::NumberOfDevices => "number-of-devices",
            Column::AsaAssigned => "asa-assigned",
            Column::KickoffDate => "kickoff-date",
            Column::TestingInfoSent => "testing-info-sent",
            Column::GoLiveDate => "go-live-date",
            Column::Comments => "comments",
            Column::FacilityUpdates => "facility-updates",
            Column::DaysSinceKickoff => "days-since-kickoff",
            Column::ExpectedCompletion => "expected-completion",
            Column::Status => "status",
            Column::DaysUntilSla => "days-until-sla",
            Column::DaysToTestingInfo => "days-to-testing-info",
            Column::DaysToCompletion => "days-to-completion",
        }
    }

    pub fn all() -> impl Iterator<Item = Column> {
        Self::SOURCE.into_iter().chain(Self::DERIVED)
    }

    /// Match a snapshot header, ignoring case and surrounding whitespace.
    pub fn from_header(header: &str) -> Option<Column> {
        let wanted = header.trim();
        Self::all().find(|c| c.header().eq_ignore_ascii_case(wanted))
    }

    pub fn is_date(self) -> bool {
        matches!(
            self,
            Column::KickoffDate
                | Column::TestingInfoSent
                | Column::GoLiveDate
                | Column::ExpectedCompletion
        )
    }

    pub fn is_derived(self) -> bool {
        Self::DERIVED.contains(&self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for Column {
    type Err = String;

    /// Accepts either the kebab-case key or the snapshot header.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::all()
            .find(|c| c.key().eq_ignore_ascii_case(trimmed))
            .or_else(|| Self::from_header(trimmed))
            .ok_or_else(|| format!("Unknown column '{trimmed}'"))
    }
}

/// A single typed value read from a row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell<'a> {
    Null,
    Text(&'a str),
    Int(i64),
    Date(NaiveDate),
}

impl Cell<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Flat-file rendering; dates as `YYYY-MM-DD`, nulls as empty.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Text(s) => (*s).to_string(),
            Cell::Int(n) => n.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }

    /// Ordering used for sorting; nulls sort after every value.
    pub fn sort_cmp(&self, other: &Cell<'_>) -> Ordering {
        match (self, other) {
            (Cell::Null, Cell::Null) => Ordering::Equal,
            (Cell::Null, _) => Ordering::Greater,
            (_, Cell::Null) => Ordering::Less,
            (Cell::Int(a), Cell::Int(b)) => a.cmp(b),
            (Cell::Date(a), Cell::Date(b)) => a.cmp(b),
            (Cell::Text(a), Cell::Text(b)) => natural_text_cmp(a, b),
            (a, b) => a.render().cmp(&b.render()),
        }
    }
}

// Defect IDs are numeric strings; compare them as numbers when both parse.
fn natural_text_cmp(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case_and_whitespace() {
        assert_eq!(Column::from_header(" kick-off date "), Some(Column::KickoffDate));
        assert_eq!(Column::from_header("CE Division"), Some(Column::Division));
        assert_eq!(Column::from_header("Export Date"), None);
    }

    #[test]
    fn from_str_accepts_key_or_header() {
        assert_eq!("defect-id".parse::<Column>(), Ok(Column::DefectId));
        assert_eq!("Design Engineer".parse::<Column>(), Ok(Column::DesignEngineer));
        assert!("nope".parse::<Column>().is_err());
    }

    #[test]
    fn nulls_sort_last_in_both_directions_of_comparison() {
        assert_eq!(Cell::Null.sort_cmp(&Cell::Int(1)), Ordering::Greater);
        assert_eq!(Cell::Int(1).sort_cmp(&Cell::Null), Ordering::Less);
        assert_eq!(Cell::Text("10").sort_cmp(&Cell::Text("9")), Ordering::Greater);
    }
}
