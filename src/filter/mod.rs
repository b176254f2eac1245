//! Row filtering over a derived table.
//!
//! Filtering is a pure function of `(table, FilterConfig)`. Predicates are
//! ANDed across kinds; within a kind they are set membership or an OR over
//! text fields. A predicate whose column is missing from the loaded snapshot
//! accepts every row so that older or newer snapshot layouts still load.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::{is_placeholder, Column, DerivedRecord, ProjectTable, Status};

pub mod session;

pub use session::{Preset, SessionState};

/// Owner value meaning "no owner filter".
pub const OWNER_ALL: &str = "All";

/// How to treat the placeholder kickoff date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum KickoffMode {
    /// No filtering.
    #[default]
    Any,
    /// Only rows whose kickoff is the placeholder.
    Placeholder,
    /// Only rows whose kickoff is not the placeholder.
    Real,
}

impl KickoffMode {
    pub fn as_str(self) -> &'static str {
        match self {
            KickoffMode::Any => "any",
            KickoffMode::Placeholder => "placeholder",
            KickoffMode::Real => "real",
        }
    }
}

/// Case-insensitive substring search over several columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    pub needle: String,
    pub fields: Vec<Column>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterConfig {
    /// Raw states to keep; empty keeps all.
    pub states: BTreeSet<String>,
    /// Effective states to drop.
    pub exclude_effective_states: BTreeSet<String>,
    /// Owner to keep; `None` or [`OWNER_ALL`] keeps all.
    pub owner: Option<String>,
    /// Statuses to keep; empty keeps all.
    pub statuses: BTreeSet<Status>,
    pub kickoff: KickoffMode,
    pub search: Option<TextSearch>,
}

impl FilterConfig {
    pub fn describe(&self) -> Value {
        json!({
            "states": self.states,
            "exclude_effective_states": self.exclude_effective_states,
            "owner": self.owner.as_deref().unwrap_or(OWNER_ALL),
            "statuses": self.statuses,
            "kickoff": self.kickoff.as_str(),
            "search": self.search.as_ref().map(|s| json!({
                "text": s.needle,
                "fields": s.fields.iter().map(|c| c.header()).collect::<Vec<_>>(),
            })),
        })
    }
}

enum Predicate<'a> {
    StateIn(&'a BTreeSet<String>),
    EffectiveStateNotIn(&'a BTreeSet<String>),
    OwnerIs(&'a str),
    StatusIn(&'a BTreeSet<Status>),
    Kickoff(KickoffMode),
    Search { needle: String, fields: Vec<Column> },
}

impl Predicate<'_> {
    fn accepts(&self, row: &DerivedRecord) -> bool {
        match self {
            Predicate::StateIn(states) => states.contains(&row.record.state),
            Predicate::EffectiveStateNotIn(states) => !states.contains(&row.effective_state),
            Predicate::OwnerIs(owner) => row.record.design_engineer.as_deref() == Some(*owner),
            Predicate::StatusIn(statuses) => statuses.contains(row.status()),
            Predicate::Kickoff(mode) => {
                let placeholder = row.record.kickoff.is_some_and(is_placeholder);
                match mode {
                    KickoffMode::Any => true,
                    KickoffMode::Placeholder => placeholder,
                    KickoffMode::Real => !placeholder,
                }
            }
            Predicate::Search { needle, fields } => fields.iter().any(|field| {
                let cell = row.cell(*field);
                !cell.is_null() && cell.render().to_lowercase().contains(needle.as_str())
            }),
        }
    }
}

fn build_predicates<'a>(table: &ProjectTable, config: &'a FilterConfig) -> Vec<Predicate<'a>> {
    let mut predicates = Vec::new();

    if !config.states.is_empty() && table.has_column(Column::ProjectState) {
        predicates.push(Predicate::StateIn(&config.states));
    }
    if !config.exclude_effective_states.is_empty() && table.has_column(Column::ProjectState) {
        predicates.push(Predicate::EffectiveStateNotIn(&config.exclude_effective_states));
    }
    if let Some(owner) = config.owner.as_deref() {
        if owner != OWNER_ALL && table.has_column(Column::DesignEngineer) {
            predicates.push(Predicate::OwnerIs(owner));
        }
    }
    if !config.statuses.is_empty() && table.has_column(Column::Status) {
        predicates.push(Predicate::StatusIn(&config.statuses));
    }
    if config.kickoff != KickoffMode::Any && table.has_column(Column::KickoffDate) {
        predicates.push(Predicate::Kickoff(config.kickoff));
    }
    if let Some(search) = &config.search {
        let needle = search.needle.trim().to_lowercase();
        let fields: Vec<Column> =
            search.fields.iter().copied().filter(|c| table.has_column(*c)).collect();
        if !needle.is_empty() && !fields.is_empty() {
            predicates.push(Predicate::Search { needle, fields });
        }
    }

    predicates
}

/// Rows of `table` matching every active predicate of `config`.
pub fn apply(table: &ProjectTable, config: &FilterConfig) -> ProjectTable {
    let predicates = build_predicates(table, config);
    let rows: Vec<DerivedRecord> = table
        .rows
        .iter()
        .filter(|row| predicates.iter().all(|p| p.accepts(row)))
        .cloned()
        .collect();
    debug!(
        predicates = predicates.len(),
        kept = rows.len(),
        total = table.len(),
        "applied filters"
    );
    table.with_rows(rows)
}
