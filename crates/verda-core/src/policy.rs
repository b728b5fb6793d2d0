//! View policies: page-scoped sensor-type filtering.
//!
//! Each page declares either the only kinds it shows (inclusion) or the
//! only kinds it hides (exclusion). The policy is applied twice: to the
//! snapshot before seeding the collection, and to every inbound live
//! update, so a message for an out-of-scope kind is silently ignored.

use crate::model::SensorKind;

/// Sensor-type filter for one page instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewPolicy {
    /// Only the listed kinds are visible.
    Include(Vec<SensorKind>),
    /// Every kind except the listed ones is visible.
    Exclude(Vec<SensorKind>),
}

impl ViewPolicy {
    /// The environment page: everything except water level and solar
    /// voltage (those belong to the resources page).
    pub fn environment() -> Self {
        Self::Exclude(vec![SensorKind::WaterLevel, SensorKind::SolarVoltage])
    }

    /// The resources page: water level and solar voltage only.
    pub fn resources() -> Self {
        Self::Include(vec![SensorKind::WaterLevel, SensorKind::SolarVoltage])
    }

    /// No filtering.
    pub fn all() -> Self {
        Self::Exclude(Vec::new())
    }

    /// Whether a sensor of `kind` belongs on this page.
    ///
    /// Membership is exact -- no wildcard. Unknown kinds are therefore
    /// invisible under inclusion and visible under exclusion.
    pub fn is_visible(&self, kind: SensorKind) -> bool {
        match self {
            Self::Include(kinds) => kinds.contains(&kind),
            Self::Exclude(kinds) => !kinds.contains(&kind),
        }
    }
}

impl Default for ViewPolicy {
    fn default() -> Self {
        Self::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusion_hides_only_the_listed_kinds() {
        let policy = ViewPolicy::environment();
        assert!(policy.is_visible(SensorKind::Temperature));
        assert!(policy.is_visible(SensorKind::Co2));
        assert!(!policy.is_visible(SensorKind::WaterLevel));
        assert!(!policy.is_visible(SensorKind::SolarVoltage));
    }

    #[test]
    fn inclusion_shows_only_the_listed_kinds() {
        let policy = ViewPolicy::resources();
        assert!(policy.is_visible(SensorKind::WaterLevel));
        assert!(policy.is_visible(SensorKind::SolarVoltage));
        assert!(!policy.is_visible(SensorKind::Temperature));
        assert!(!policy.is_visible(SensorKind::Light));
    }

    #[test]
    fn unknown_kinds_default_by_policy_mode() {
        assert!(ViewPolicy::environment().is_visible(SensorKind::Unknown));
        assert!(!ViewPolicy::resources().is_visible(SensorKind::Unknown));
    }

    #[test]
    fn all_shows_everything() {
        let policy = ViewPolicy::all();
        assert!(policy.is_visible(SensorKind::WaterLevel));
        assert!(policy.is_visible(SensorKind::Unknown));
    }
}
