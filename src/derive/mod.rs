//! Row-level derivation of kickoff, SLA and milestone fields.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::state::DESIGN;
use crate::domain::{
    valid_anchor, Column, Config, DerivedFields, DerivedRecord, LabelMap, ProjectRecord,
    ProjectTable, SlaPolicy, Snapshot,
};

pub mod dates;
pub mod status;

pub use dates::{days_between, nth_weekday_after, parse_date, parse_datetime};
pub use status::derive_status;

/// Applies the derivation rules against a fixed reference date.
#[derive(Debug, Clone)]
pub struct Deriver {
    today: NaiveDate,
    policy: SlaPolicy,
    states: LabelMap,
}

impl Deriver {
    pub fn new(today: NaiveDate, policy: SlaPolicy, states: LabelMap) -> Self {
        Self { today, policy, states }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.today(), config.sla.clone(), config.state_map())
    }

    pub fn effective_state<'a>(&'a self, raw: &'a str) -> &'a str {
        self.states.resolve(raw)
    }

    /// Derived fields of one record. Never fails: missing or placeholder
    /// dates null out the fields that depend on them.
    pub fn derive(&self, record: &ProjectRecord) -> DerivedFields {
        let effective = self.effective_state(&record.state);
        let kickoff = valid_anchor(record.kickoff);

        let days_since_kickoff = kickoff.map(|k| days_between(k, self.today));
        let expected_completion = kickoff.map(|k| {
            nth_weekday_after(k, self.policy.completion_weekday, self.policy.completion_occurrence)
        });
        let status = derive_status(effective, days_since_kickoff, &self.policy);
        let days_until_sla = if effective == DESIGN {
            expected_completion.map(|due| days_between(self.today, due))
        } else {
            None
        };

        DerivedFields {
            days_since_kickoff,
            expected_completion,
            status,
            days_until_sla,
            days_to_testing_info: milestone_gap(kickoff, record.testing_info_sent),
            days_to_completion: milestone_gap(kickoff, record.go_live),
        }
    }

    pub fn derive_record(&self, record: ProjectRecord) -> DerivedRecord {
        let derived = self.derive(&record);
        let effective_state = self.effective_state(&record.state).to_string();
        DerivedRecord { record, effective_state, derived }
    }

    /// Derive every row of a snapshot into a new table.
    pub fn derive_table(&self, snapshot: Snapshot) -> ProjectTable {
        let Snapshot { records, mut columns, exported_at, source, digest } = snapshot;
        columns.extend(Column::DERIVED);
        let rows: Vec<DerivedRecord> =
            records.into_iter().map(|record| self.derive_record(record)).collect();
        debug!(rows = rows.len(), today = %self.today, "derived project table");
        ProjectTable { rows, columns, exported_at, source, digest, today: self.today }
    }
}

/// Days between two milestones; null unless both are real dates.
pub fn milestone_gap(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Option<i64> {
    Some(days_between(valid_anchor(from)?, valid_anchor(to)?))
}
