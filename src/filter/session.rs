//! Explicit filter session state.
//!
//! Holds the user's current selections between invocations. Each command
//! receives a `SessionState` value and turns it into a [`FilterConfig`];
//! nothing is kept in globals.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::{FilterConfig, KickoffMode, TextSearch, OWNER_ALL};
use crate::domain::state::INTAKE;
use crate::domain::{Column, Config, Status};

/// Quick selections offered above the state picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Design, Firewall, Testing, Intake and Hold.
    ActiveOnly,
    /// Intake projects whose kickoff is still the placeholder.
    AwaitingKickoff,
    /// Every state present in the snapshot.
    AllProjects,
}

impl Preset {
    pub fn label(self) -> &'static str {
        match self {
            Preset::ActiveOnly => "Active Only",
            Preset::AwaitingKickoff => "Awaiting Kickoff",
            Preset::AllProjects => "All Projects",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionState {
    pub selected_states: Vec<String>,
    pub engineer: String,
    pub statuses: Vec<Status>,
    pub kickoff: KickoffMode,
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    pub active_only: bool,
    /// Effective states dropped on top of `active_only`.
    pub exclude_states: Vec<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl SessionState {
    pub fn new(config: &Config) -> Self {
        Self {
            selected_states: config.default_states.clone(),
            engineer: OWNER_ALL.to_string(),
            statuses: Vec::new(),
            kickoff: KickoffMode::Any,
            search: None,
            search_fields: config.search_fields.clone(),
            active_only: false,
            exclude_states: Vec::new(),
        }
    }

    /// Apply a quick selection against the states present in the snapshot.
    pub fn apply_preset(&mut self, preset: Preset, available_states: &[String], config: &Config) {
        match preset {
            Preset::ActiveOnly => {
                self.selected_states = available_states
                    .iter()
                    .filter(|s| config.active_states.contains(s))
                    .cloned()
                    .collect();
            }
            Preset::AwaitingKickoff => {
                self.selected_states = vec![INTAKE.to_string()];
                self.kickoff = KickoffMode::Placeholder;
            }
            Preset::AllProjects => {
                self.selected_states = available_states.to_vec();
                self.kickoff = KickoffMode::Any;
            }
        }
    }

    pub fn to_filter(&self, config: &Config) -> Result<FilterConfig> {
        let search = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let fields = self
                    .search_fields
                    .iter()
                    .map(|f| f.parse::<Column>().map_err(anyhow::Error::msg))
                    .collect::<Result<Vec<_>>>()
                    .context("Invalid search field")?;
                Some(TextSearch { needle: needle.to_string(), fields })
            }
            _ => None,
        };

        Ok(FilterConfig {
            states: self.selected_states.iter().cloned().collect(),
            exclude_effective_states: self
                .active_only
                .then_some(&config.closed_states)
                .into_iter()
                .flatten()
                .chain(&self.exclude_states)
                .cloned()
                .collect(),
            owner: Some(self.engineer.clone()),
            statuses: self.statuses.iter().cloned().collect(),
            kickoff: self.kickoff,
            search,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed reading session file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid session file: {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("Failed writing session file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn states(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_selects_design_and_firewall() {
        let session = SessionState::default();
        assert_eq!(session.selected_states, states(&["Design", "Firewall"]));
        assert_eq!(session.engineer, OWNER_ALL);
        assert_eq!(session.kickoff, KickoffMode::Any);
    }

    #[test]
    fn active_only_keeps_present_active_states() {
        let config = Config::default();
        let mut session = SessionState::new(&config);
        let available = states(&["Cancelled", "Complete", "Design", "Hold", "Testing"]);
        session.apply_preset(Preset::ActiveOnly, &available, &config);
        assert_eq!(session.selected_states, states(&["Design", "Hold", "Testing"]));
    }

    #[test]
    fn awaiting_kickoff_targets_intake_placeholders() {
        let config = Config::default();
        let mut session = SessionState::new(&config);
        session.apply_preset(Preset::AwaitingKickoff, &[], &config);
        let filter = session.to_filter(&config).expect("filter");
        assert_eq!(filter.kickoff, KickoffMode::Placeholder);
        assert!(filter.states.contains("Intake"));
        assert_eq!(filter.states.len(), 1);
    }

    #[test]
    fn all_projects_resets_kickoff_mode() {
        let config = Config::default();
        let mut session = SessionState::new(&config);
        session.kickoff = KickoffMode::Placeholder;
        let available = states(&["Design", "Intake"]);
        session.apply_preset(Preset::AllProjects, &available, &config);
        assert_eq!(session.selected_states, available);
        assert_eq!(session.kickoff, KickoffMode::Any);
    }

    #[test]
    fn unknown_search_field_is_rejected() {
        let config = Config::default();
        let session = SessionState {
            search: Some("42".to_string()),
            search_fields: states(&["not-a-column"]),
            ..SessionState::new(&config)
        };
        assert!(session.to_filter(&config).is_err());
    }

    #[test]
    fn blank_search_is_no_search() {
        let config = Config::default();
        let session = SessionState { search: Some("   ".to_string()), ..SessionState::new(&config) };
        assert!(session.to_filter(&config).expect("filter").search.is_none());
    }

    #[test]
    fn session_survives_save_and_load() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("nested").join("session.json");
        let session = SessionState {
            statuses: vec![Status::Overdue, Status::OnTrack],
            engineer: "Avery".to_string(),
            active_only: true,
            exclude_states: vec!["Hold".to_string()],
            ..SessionState::default()
        };
        session.save(&path).expect("save");
        assert_eq!(SessionState::load(&path).expect("load"), session);
    }
}
