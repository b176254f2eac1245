//! Runtime configuration.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use super::sla::SlaPolicy;
use super::state::{self, LabelMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding exported snapshots.
    pub data_dir: PathBuf,
    /// File name of the latest project snapshot inside `data_dir`.
    pub snapshot_file: String,
    /// File name of the latest performance snapshot inside `data_dir`.
    pub performance_file: String,
    /// Where `export` writes its files.
    pub output_dir: PathBuf,
    pub sla: SlaPolicy,
    /// Raw state label -> effective state label.
    pub state_rules: BTreeMap<String, String>,
    /// Service area -> market area.
    pub service_area_groups: BTreeMap<String, String>,
    /// States selected when no filter or session says otherwise.
    #[serde(deserialize_with = "string_or_list")]
    pub default_states: Vec<String>,
    #[serde(deserialize_with = "string_or_list")]
    pub active_states: Vec<String>,
    /// Effective states dropped by `--active-only`.
    #[serde(deserialize_with = "string_or_list")]
    pub closed_states: Vec<String>,
    /// Columns searched by `--search` when no field is named.
    #[serde(deserialize_with = "string_or_list")]
    pub search_fields: Vec<String>,
    /// Strip HTML from free-text columns during export.
    pub clean_markup: bool,
    /// Months of completed projects kept in the performance export.
    pub performance_window_months: u32,
    /// Fixed reference date; the local date is used when unset.
    pub today: Option<NaiveDate>,
    /// Value written to the `Export Source` column.
    pub export_source: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("exported_data"),
            snapshot_file: "projects_latest.csv".to_string(),
            performance_file: "performance_latest.csv".to_string(),
            output_dir: PathBuf::from("exported_data"),
            sla: SlaPolicy::default(),
            state_rules: LabelMap::default_state_rules(),
            service_area_groups: LabelMap::default_service_area_groups(),
            default_states: vec![state::DESIGN.to_string(), state::FIREWALL.to_string()],
            active_states: state::ACTIVE_STATES.iter().map(|s| s.to_string()).collect(),
            closed_states: state::CLOSED_STATES.iter().map(|s| s.to_string()).collect(),
            search_fields: vec!["defect-id".to_string()],
            clean_markup: true,
            performance_window_months: 6,
            today: None,
            export_source: None,
        }
    }
}

impl Config {
    pub fn state_map(&self) -> LabelMap {
        LabelMap::new(self.state_rules.clone())
    }

    pub fn service_area_map(&self) -> LabelMap {
        LabelMap::new(self.service_area_groups.clone())
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    pub fn export_source(&self) -> String {
        self.export_source
            .clone()
            .or_else(|| std::env::var("HOSTNAME").ok())
            .or_else(|| std::env::var("COMPUTERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Accept `["a", "b"]` or `"a, b"`.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let items = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => s.split(',').map(str::to_string).collect::<Vec<_>>(),
        OneOrMany::Many(v) => v,
    };
    Ok(items.into_iter().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
}
