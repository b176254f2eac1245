//! Categorical status rules.

use crate::domain::state::{COMPLETE, DESIGN, FIREWALL, HOLD, INTAKE, SECURITY, TESTING};
use crate::domain::{SlaPolicy, Status};

/// Status of a project from its effective state and elapsed design time.
///
/// Only `Design` has an SLA; every other known state maps to a fixed
/// status and unknown states pass their label through.
pub fn derive_status(
    effective_state: &str,
    days_since_kickoff: Option<i64>,
    policy: &SlaPolicy,
) -> Status {
    match effective_state {
        DESIGN => match days_since_kickoff {
            None => Status::NoKickoffDate,
            Some(days) if days <= policy.on_track_days => Status::OnTrack,
            Some(days) if days <= policy.sla_days => Status::AttentionNeeded,
            Some(_) => Status::Overdue,
        },
        FIREWALL => Status::WaitingForFirewall,
        TESTING => Status::PendingSiteUpdates,
        INTAKE => Status::InIntake,
        HOLD => Status::OnHold,
        COMPLETE | SECURITY => Status::Completed,
        other => Status::Other(other.to_string()),
    }
}
