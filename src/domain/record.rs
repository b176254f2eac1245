//! Project records as read from the snapshot, and their derived companions.

use chrono::NaiveDate;

use super::column::{Cell, Column};
use super::status::Status;

/// One tracked item, exactly as the upstream extraction produced it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectRecord {
    pub defect_id: String,
    /// Raw state label, before any remapping.
    pub state: String,
    pub design_engineer: Option<String>,
    pub priority: Option<String>,
    pub service_area: Option<String>,
    pub service_line: Option<String>,
    pub division: Option<String>,
    pub facility: Option<String>,
    pub opw: Option<String>,
    pub number_of_devices: Option<String>,
    pub asa_assigned: Option<String>,
    pub kickoff: Option<NaiveDate>,
    pub testing_info_sent: Option<NaiveDate>,
    pub go_live: Option<NaiveDate>,
    pub comments: Option<String>,
    pub facility_updates: Option<String>,
}

impl ProjectRecord {
    pub fn new(defect_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self { defect_id: defect_id.into(), state: state.into(), ..Self::default() }
    }

    /// Text value of a source column; `None` for date or derived columns.
    pub fn text(&self, column: Column) -> Option<&str> {
        let value = match column {
            Column::DefectId => return Some(&self.defect_id),
            Column::ProjectState => return Some(&self.state),
            Column::DesignEngineer => &self.design_engineer,
            Column::Priority => &self.priority,
            Column::ServiceArea => &self.service_area,
            Column::ServiceLine => &self.service_line,
            Column::Division => &self.division,
            Column::Facility => &self.facility,
            Column::Opw => &self.opw,
            Column::NumberOfDevices => &self.number_of_devices,
            Column::AsaAssigned => &self.asa_assigned,
            Column::Comments => &self.comments,
            Column::FacilityUpdates => &self.facility_updates,
            _ => return None,
        };
        value.as_deref()
    }

    pub fn text_mut(&mut self, column: Column) -> Option<&mut Option<String>> {
        match column {
            Column::DesignEngineer => Some(&mut self.design_engineer),
            Column::Priority => Some(&mut self.priority),
            Column::ServiceArea => Some(&mut self.service_area),
            Column::ServiceLine => Some(&mut self.service_line),
            Column::Division => Some(&mut self.division),
            Column::Facility => Some(&mut self.facility),
            Column::Opw => Some(&mut self.opw),
            Column::NumberOfDevices => Some(&mut self.number_of_devices),
            Column::AsaAssigned => Some(&mut self.asa_assigned),
            Column::Comments => Some(&mut self.comments),
            Column::FacilityUpdates => Some(&mut self.facility_updates),
            _ => None,
        }
    }

    /// Milestone date of a source date column.
    pub fn date(&self, column: Column) -> Option<NaiveDate> {
        match column {
            Column::KickoffDate => self.kickoff,
            Column::TestingInfoSent => self.testing_info_sent,
            Column::GoLiveDate => self.go_live,
            _ => None,
        }
    }

    pub fn date_mut(&mut self, column: Column) -> Option<&mut Option<NaiveDate>> {
        match column {
            Column::KickoffDate => Some(&mut self.kickoff),
            Column::TestingInfoSent => Some(&mut self.testing_info_sent),
            Column::GoLiveDate => Some(&mut self.go_live),
            _ => None,
        }
    }
}

/// Values computed from a record; every field is null when its inputs are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    pub days_since_kickoff: Option<i64>,
    pub expected_completion: Option<NaiveDate>,
    pub status: Status,
    pub days_until_sla: Option<i64>,
    pub days_to_testing_info: Option<i64>,
    pub days_to_completion: Option<i64>,
}

/// A record paired with its effective state and derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRecord {
    pub record: ProjectRecord,
    pub effective_state: String,
    pub derived: DerivedFields,
}

impl DerivedRecord {
    pub fn status(&self) -> &Status {
        &self.derived.status
    }

    /// Typed value of any known column.
    pub fn cell(&self, column: Column) -> Cell<'_> {
        let d = &self.derived;
        let int = |v: Option<i64>| v.map(Cell::Int).unwrap_or(Cell::Null);
        match column {
            Column::KickoffDate | Column::TestingInfoSent | Column::GoLiveDate => {
                self.record.date(column).map(Cell::Date).unwrap_or(Cell::Null)
            }
            Column::DaysSinceKickoff => int(d.days_since_kickoff),
            Column::ExpectedCompletion => {
                d.expected_completion.map(Cell::Date).unwrap_or(Cell::Null)
            }
            Column::Status => Cell::Text(d.status.label()),
            Column::DaysUntilSla => int(d.days_until_sla),
            Column::DaysToTestingInfo => int(d.days_to_testing_info),
            Column::DaysToCompletion => int(d.days_to_completion),
            other => self.record.text(other).map(Cell::Text).unwrap_or(Cell::Null),
        }
    }
}
