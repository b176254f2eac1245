//! Project state labels and many-to-one label remapping.

use std::collections::BTreeMap;

pub const DESIGN: &str = "Design";
pub const FIREWALL: &str = "Firewall";
pub const TESTING: &str = "Testing";
pub const INTAKE: &str = "Intake";
pub const HOLD: &str = "Hold";
pub const COMPLETE: &str = "Complete";
pub const SECURITY: &str = "Security";
pub const CANCELLED: &str = "Cancelled";

/// States considered in flight by the "Active Only" preset.
pub const ACTIVE_STATES: [&str; 5] = [DESIGN, FIREWALL, TESTING, INTAKE, HOLD];

/// States dropped by "active only" exclusion, compared after remapping.
pub const CLOSED_STATES: [&str; 2] = [COMPLETE, CANCELLED];

/// Fixed renaming rules collapsing several labels onto a canonical one.
///
/// Used for effective project states and for rolling service areas up into
/// market areas. Labels without a rule resolve to themselves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelMap {
    rules: BTreeMap<String, String>,
}

impl LabelMap {
    pub fn new(rules: BTreeMap<String, String>) -> Self {
        Self { rules }
    }

    pub fn default_state_rules() -> BTreeMap<String, String> {
        BTreeMap::from([(SECURITY.to_string(), COMPLETE.to_string())])
    }

    pub fn default_service_area_groups() -> BTreeMap<String, String> {
        [
            ("Imaging-RAD", "Imaging"),
            ("Imaging-Cardio", "Imaging"),
            ("Imaging-RadOnc", "Imaging"),
            ("Lab-MDI", "Lab"),
            ("Lab-POC", "Lab"),
            ("BMDI", "BMDI/Other"),
            ("Other", "BMDI/Other"),
        ]
        .into_iter()
        .map(|(from, to)| (from.to_string(), to.to_string()))
        .collect()
    }

    pub fn resolve<'a>(&'a self, label: &'a str) -> &'a str {
        self.rules.get(label).map(String::as_str).unwrap_or(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn security_collapses_onto_complete() {
        let map = LabelMap::new(LabelMap::default_state_rules());
        assert_eq!(map.resolve(SECURITY), COMPLETE);
        assert_eq!(map.resolve(COMPLETE), COMPLETE);
        assert_eq!(map.resolve("Brand New State"), "Brand New State");
    }

    #[test]
    fn service_areas_roll_up_into_market_areas() {
        let map = LabelMap::new(LabelMap::default_service_area_groups());
        assert_eq!(map.resolve("Imaging-Cardio"), "Imaging");
        assert_eq!(map.resolve("Lab-POC"), "Lab");
        assert_eq!(map.resolve("Other"), "BMDI/Other");
        assert_eq!(map.resolve("Pharmacy"), "Pharmacy");
    }
}
