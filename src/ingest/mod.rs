//! Loading tabular snapshots from disk.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::domain::Config;

pub mod markup;
pub mod snapshot;

pub use markup::{clean_markup, clean_record};
pub use snapshot::{load_snapshot, parse_snapshot};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No data available: no snapshot found (looked in {})", display_paths(.searched))]
    NoSnapshot { searched: Vec<PathBuf> },

    #[error("No data available: snapshot {path} is empty")]
    EmptySnapshot { path: String },

    #[error("Snapshot is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

/// Candidate snapshot locations: the data directory, then the working
/// directory.
pub fn snapshot_candidates(config: &Config) -> Vec<PathBuf> {
    vec![config.data_dir.join(&config.snapshot_file), PathBuf::from(&config.snapshot_file)]
}

/// First existing snapshot file, or [`IngestError::NoSnapshot`].
pub fn discover_snapshot(config: &Config) -> Result<PathBuf, IngestError> {
    let searched = snapshot_candidates(config);
    match searched.iter().find(|p| p.is_file()) {
        Some(path) => {
            debug!(path = %path.display(), "found snapshot");
            Ok(path.clone())
        }
        None => Err(IngestError::NoSnapshot { searched }),
    }
}

/// Resolve an explicit `--input` or fall back to discovery.
pub fn resolve_snapshot(explicit: Option<&Path>, config: &Config) -> Result<PathBuf, IngestError> {
    match explicit {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => Err(IngestError::NoSnapshot { searched: vec![path.to_path_buf()] }),
        None => discover_snapshot(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn discovery_prefers_data_dir() {
        let tmp = TempDir::new().unwrap();
        let data_dir = tmp.path().join("exported_data");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(data_dir.join("projects_latest.csv"), "Defect ID,Project State\n").unwrap();

        let config = Config { data_dir: data_dir.clone(), ..Config::default() };
        let found = discover_snapshot(&config).unwrap();
        assert_eq!(found, data_dir.join("projects_latest.csv"));
    }

    #[test]
    fn missing_snapshot_lists_searched_paths() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            data_dir: tmp.path().join("nowhere"),
            snapshot_file: "does_not_exist_anywhere.csv".to_string(),
            ..Config::default()
        };
        let err = discover_snapshot(&config).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("No data available"));
        assert!(message.contains("does_not_exist_anywhere.csv"));
    }

    #[test]
    fn explicit_missing_input_is_no_snapshot() {
        let err = resolve_snapshot(Some(Path::new("/nope/raw.csv")), &Config::default()).unwrap_err();
        assert!(matches!(err, IngestError::NoSnapshot { .. }));
    }
}
