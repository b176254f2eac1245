//! Layering of environment variables and command-line flags over file config.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use figment::providers::{Env, Serialized};
use figment::Figment;
use std::path::PathBuf;

use crate::domain::Config;

/// Environment prefix; nested keys are separated by `__`
/// (`DESIGN_TRACKER_SLA__SLA_DAYS=30`).
pub const ENV_PREFIX: &str = "DESIGN_TRACKER_";

/// Settings that can also be given as command-line flags.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub today: Option<NaiveDate>,
    pub sla_days: Option<i64>,
}

/// Overlay `DESIGN_TRACKER_*` variables on `base`.
pub fn apply_env(base: Config) -> Result<Config> {
    apply_env_from(base, Env::prefixed(ENV_PREFIX).split("__"))
}

fn apply_env_from(base: Config, env: Env) -> Result<Config> {
    Figment::from(Serialized::defaults(base))
        .merge(env)
        .extract()
        .context("Invalid configuration from environment")
}

/// CLI > env > file > defaults.
pub fn merge_cli_with_config(file_config: Config, cli: &CliOverrides) -> Result<Config> {
    let mut merged = apply_env(file_config)?;

    if let Some(dir) = &cli.data_dir {
        merged.data_dir = dir.clone();
    }
    if let Some(dir) = &cli.output_dir {
        merged.output_dir = dir.clone();
    }
    if let Some(today) = cli.today {
        merged.today = Some(today);
    }
    if let Some(days) = cli.sla_days {
        merged.sla.sla_days = days;
    }

    Ok(merged)
}
