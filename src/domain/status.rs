//! Derived categorical status.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    NoKickoffDate,
    OnTrack,
    AttentionNeeded,
    Overdue,
    WaitingForFirewall,
    PendingSiteUpdates,
    InIntake,
    OnHold,
    Completed,
    /// Any state without a fixed status keeps its effective state label.
    Other(String),
}

impl Status {
    pub const KNOWN: [Status; 9] = [
        Status::NoKickoffDate,
        Status::OnTrack,
        Status::AttentionNeeded,
        Status::Overdue,
        Status::WaitingForFirewall,
        Status::PendingSiteUpdates,
        Status::InIntake,
        Status::OnHold,
        Status::Completed,
    ];

    pub fn label(&self) -> &str {
        match self {
            Status::NoKickoffDate => "No Kickoff Date",
            Status::OnTrack => "On Track",
            Status::AttentionNeeded => "Attention Needed",
            Status::Overdue => "Overdue",
            Status::WaitingForFirewall => "Waiting for Firewall",
            Status::PendingSiteUpdates => "Pending Updates from Site",
            Status::InIntake => "In Intake Process",
            Status::OnHold => "On Hold",
            Status::Completed => "Completed",
            Status::Other(label) => label,
        }
    }

    /// Parse a status label; unknown labels become [`Status::Other`].
    pub fn from_label(label: &str) -> Status {
        let trimmed = label.trim();
        Self::KNOWN
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| Status::Other(trimmed.to_string()))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Status::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_parse() {
        for status in Status::KNOWN {
            assert_eq!(Status::from_label(status.label()), status);
        }
        assert_eq!(Status::from_label("on track"), Status::OnTrack);
        assert_eq!(Status::from_label("Cancelled"), Status::Other("Cancelled".to_string()));
    }
}
