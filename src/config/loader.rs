//! Config file loading

use crate::domain::Config;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Section name accepted as a wrapper around the settings.
const NESTED_SECTION: &str = "design-tracker";

const CANDIDATES: [&str; 5] =
    ["design-tracker.toml", ".design-tracker.toml", "tracker.toml", "tracker.yml", "tracker.yaml"];

/// Load settings from `config_path`, or from the first config file found in
/// `search_dir`.
///
/// An explicitly named file must parse. A discovered file that fails to
/// parse is reported with a warning and defaults are used instead.
pub fn load_config(search_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let explicit = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(search_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(Config::default());
    };

    let parsed = read_config_file(&config_file);
    match parsed {
        Ok(cfg) => {
            tracing::debug!(path = %config_file.display(), "loaded config");
            Ok(cfg)
        }
        Err(e) if explicit => Err(e),
        Err(e) => {
            tracing::warn!("Ignoring auto-discovered config {}: {:#}", config_file.display(), e);
            Ok(Config::default())
        }
    }
}

fn read_config_file(config_file: &Path) -> Result<Config> {
    let content = fs::read_to_string(config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "toml" => parse_toml_config(&content, config_file),
        "yaml" | "yml" => parse_yaml_config(&content, config_file),
        other => anyhow::bail!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        ),
    }
}

/// Parse TOML config, supporting a nested `[design-tracker]` section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested `design-tracker` mapping.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<Config> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(NESTED_SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(search_dir: &Path) -> Option<PathBuf> {
    CANDIDATES.iter().map(|c| search_dir.join(c)).find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("design-tracker.toml"),
            "data_dir = 'snapshots'\ntoday = '2025-08-20'\n[sla]\nsla_days = 30\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.data_dir, PathBuf::from("snapshots"));
        assert_eq!(cfg.today, NaiveDate::from_ymd_opt(2025, 8, 20));
        assert_eq!(cfg.sla.sla_days, 30);
        assert_eq!(cfg.sla.on_track_days, 14);
    }

    #[test]
    fn test_nested_section_toml() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("tracker.toml"),
            "[design-tracker]\nsnapshot_file = 'other.csv'\n[design-tracker.state_rules]\nFirewall = 'Design'\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.snapshot_file, "other.csv");
        assert_eq!(cfg.state_map().resolve("Firewall"), "Design");
        // Replacing the map drops the default rule.
        assert_eq!(cfg.state_map().resolve("Security"), "Security");
    }

    #[test]
    fn test_yaml_config_with_comma_list() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("tracker.yml");
        fs::write(&path, "design-tracker:\n  default_states: 'Design, Testing ,Hold'\n").expect("write");

        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg.default_states, vec!["Design", "Testing", "Hold"]);
    }

    #[test]
    fn test_explicit_config_invalid_type_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "default_states = 123\n").expect("write");

        let result = load_config(tmp.path(), Some(&path));
        assert!(result.is_err(), "explicit config with invalid type should return Err");
    }

    #[test]
    fn test_explicit_unsupported_extension_returns_err() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("tracker.ini");
        fs::write(&path, "x=1\n").expect("write");
        assert!(load_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn test_auto_discovered_invalid_type_returns_default() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("design-tracker.toml"), "search_fields = [\"defect-id\", 123]\n")
            .expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, Config::default());
    }
}
