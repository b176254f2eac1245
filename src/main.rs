//! design-tracker: derive SLA status for design projects and report on them
//!
//! Reads exported project snapshots, computes kickoff/SLA fields, and produces
//! filtered reports and flat-file exports for the dashboard.

use anyhow::Result;

fn main() -> Result<()> {
    design_tracker::cli::run()
}
