//! Filter flags shared by `report` and `list`.

use anyhow::{bail, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

use super::utils::parse_csv_multi;
use crate::domain::{Config, ProjectTable, Status};
use crate::filter::{FilterConfig, KickoffMode, Preset, SessionState};

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Keep only these raw project states (repeatable or comma-separated)
    #[arg(long = "state", value_name = "STATES")]
    pub states: Vec<String>,

    /// Drop these states after remapping (repeatable or comma-separated)
    #[arg(long = "exclude-state", value_name = "STATES")]
    pub exclude_states: Vec<String>,

    /// Drop closed projects (Complete and Cancelled after remapping)
    #[arg(long)]
    pub active_only: bool,

    /// Keep only projects owned by this design engineer ('All' for everyone)
    #[arg(long, value_name = "NAME")]
    pub engineer: Option<String>,

    /// Keep only these statuses, e.g. 'Overdue' or 'attention-needed'
    #[arg(long = "status", value_name = "STATUSES")]
    pub statuses: Vec<String>,

    /// Kick-off date handling
    #[arg(long, value_enum, value_name = "MODE")]
    pub kickoff: Option<KickoffMode>,

    /// Case-insensitive text search
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Columns searched by --search (keys or headers; default from config)
    #[arg(long = "search-field", value_name = "COLUMNS")]
    pub search_fields: Vec<String>,

    /// Start from a quick selection
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Load the filter session from this JSON file when it exists
    #[arg(long, value_name = "FILE")]
    pub session: Option<PathBuf>,

    /// Write the resulting session back to the --session file
    #[arg(long, requires = "session")]
    pub save_session: bool,
}

/// Accepts a status label or its kebab-case form. Unknown labels pass
/// through unchanged, hyphens included.
pub fn parse_status(value: &str) -> Result<Status> {
    let value = value.trim();
    if value.is_empty() {
        bail!("Empty status value");
    }
    let status = Status::from_label(value);
    if !matches!(status, Status::Other(_)) {
        return Ok(status);
    }
    match Status::from_label(&value.replace('-', " ")) {
        Status::Other(_) => Ok(status),
        known => Ok(known),
    }
}

impl FilterArgs {
    /// Session from file (or config defaults) with preset applied.
    pub fn base_session(&self, config: &Config, table: &ProjectTable) -> Result<SessionState> {
        let mut session = match &self.session {
            Some(path) if path.exists() => SessionState::load(path)?,
            _ => SessionState::new(config),
        };
        if let Some(preset) = self.preset {
            debug!(preset = preset.label(), "applying preset");
            session.apply_preset(preset, &table.distinct_states(), config);
        }
        Ok(session)
    }

    /// Apply explicit flags on top of `session`.
    pub fn apply_flags(&self, session: &mut SessionState) -> Result<()> {
        let states = parse_csv_multi(&self.states);
        if !states.is_empty() {
            session.selected_states = states;
        }
        if let Some(engineer) = &self.engineer {
            session.engineer = engineer.trim().to_string();
        }
        let statuses = parse_csv_multi(&self.statuses);
        if !statuses.is_empty() {
            session.statuses = statuses.iter().map(|s| parse_status(s)).collect::<Result<_>>()?;
        }
        if let Some(kickoff) = self.kickoff {
            session.kickoff = kickoff;
        }
        if let Some(search) = &self.search {
            session.search = Some(search.clone());
        }
        let fields = parse_csv_multi(&self.search_fields);
        if !fields.is_empty() {
            session.search_fields = fields;
        }
        if self.active_only {
            session.active_only = true;
        }
        let excluded = parse_csv_multi(&self.exclude_states);
        if !excluded.is_empty() {
            session.exclude_states = excluded;
        }
        Ok(())
    }

    /// Turn the final session into a filter, saving it when asked.
    pub fn finish(&self, session: &SessionState, config: &Config) -> Result<FilterConfig> {
        let filter = session.to_filter(config)?;

        if self.save_session {
            if let Some(path) = &self.session {
                session.save(path)?;
                eprintln!("Saved session to {}", path.display());
            }
        }
        Ok(filter)
    }

    /// Non-interactive resolution: session, preset, flags, filter.
    pub fn resolve(&self, config: &Config, table: &ProjectTable) -> Result<FilterConfig> {
        let mut session = self.base_session(config, table)?;
        self.apply_flags(&mut session)?;
        self.finish(&session, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::Deriver;
    use crate::domain::{ProjectRecord, Snapshot};
    use tempfile::TempDir;

    fn table(config: &Config) -> ProjectTable {
        Deriver::from_config(config).derive_table(Snapshot {
            records: vec![
                ProjectRecord::new("1", "Design"),
                ProjectRecord::new("2", "Hold"),
                ProjectRecord::new("3", "Complete"),
            ],
            ..Snapshot::default()
        })
    }

    #[test]
    fn statuses_accept_labels_and_kebab_case() {
        assert_eq!(parse_status("Overdue").unwrap(), Status::Overdue);
        assert_eq!(parse_status("attention-needed").unwrap(), Status::AttentionNeeded);
        assert_eq!(parse_status("waiting-for-firewall").unwrap(), Status::WaitingForFirewall);
        assert!(parse_status(" ").is_err());
    }

    #[test]
    fn hyphenated_unknown_status_passes_through() {
        assert_eq!(parse_status("Post-Install").unwrap(), Status::Other("Post-Install".to_string()));
        assert_eq!(parse_status(" on-track ").unwrap(), Status::OnTrack);
    }

    #[test]
    fn hyphenated_status_filter_keeps_matching_rows() {
        let config = Config::default();
        let table = Deriver::from_config(&config).derive_table(Snapshot {
            records: vec![
                ProjectRecord::new("1", "Post-Install"),
                ProjectRecord::new("2", "Design"),
            ],
            ..Snapshot::default()
        });
        let args = FilterArgs {
            preset: Some(Preset::AllProjects),
            statuses: vec!["Post-Install".to_string()],
            ..FilterArgs::default()
        };
        let filter = args.resolve(&config, &table).unwrap();
        let ids: Vec<String> =
            crate::filter::apply(&table, &filter).rows.iter().map(|r| r.record.defect_id.clone()).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn excluded_states_are_saved_with_the_session() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        let config = Config::default();
        let table = table(&config);

        let first = FilterArgs {
            session: Some(path.clone()),
            save_session: true,
            exclude_states: vec!["Hold".to_string()],
            ..FilterArgs::default()
        };
        first.resolve(&config, &table).unwrap();

        let second = FilterArgs { session: Some(path), ..FilterArgs::default() };
        let filter = second.resolve(&config, &table).unwrap();
        assert!(filter.exclude_effective_states.contains("Hold"));
    }

    #[test]
    fn defaults_select_design_and_firewall() {
        let config = Config::default();
        let filter = FilterArgs::default().resolve(&config, &table(&config)).unwrap();
        assert_eq!(filter.states.len(), 2);
        assert!(filter.states.contains("Design"));
        assert!(filter.states.contains("Firewall"));
        assert!(filter.exclude_effective_states.is_empty());
    }

    #[test]
    fn flags_override_preset() {
        let config = Config::default();
        let args = FilterArgs {
            preset: Some(Preset::AllProjects),
            states: vec!["Hold,Design".to_string()],
            active_only: true,
            exclude_states: vec!["Hold".to_string()],
            ..FilterArgs::default()
        };
        let filter = args.resolve(&config, &table(&config)).unwrap();
        assert_eq!(filter.states.len(), 2);
        assert!(filter.exclude_effective_states.contains("Complete"));
        assert!(filter.exclude_effective_states.contains("Hold"));
    }

    #[test]
    fn saved_session_is_reloaded() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("session.json");
        let config = Config::default();
        let table = table(&config);

        let first = FilterArgs {
            session: Some(path.clone()),
            save_session: true,
            engineer: Some("Avery".to_string()),
            ..FilterArgs::default()
        };
        first.resolve(&config, &table).unwrap();

        let second = FilterArgs { session: Some(path), ..FilterArgs::default() };
        let filter = second.resolve(&config, &table).unwrap();
        assert_eq!(filter.owner.as_deref(), Some("Avery"));
    }
}
