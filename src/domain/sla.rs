//! SLA thresholds for design work.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlaPolicy {
    /// Last day (inclusive) on which a design project is "On Track".
    pub on_track_days: i64,
    /// Maximum days between kickoff and the measured milestone.
    pub sla_days: i64,
    /// Weekday the expected completion date lands on.
    pub completion_weekday: Weekday,
    /// How many of those weekdays after kickoff the completion falls on.
    pub completion_occurrence: u32,
    /// Days-until-SLA at or below which a design project is urgent.
    pub urgent_days: i64,
}

impl Default for SlaPolicy {
    fn default() -> Self {
        Self {
            on_track_days: 14,
            sla_days: 21,
            completion_weekday: Weekday::Fri,
            completion_occurrence: 3,
            urgent_days: 3,
        }
    }
}
