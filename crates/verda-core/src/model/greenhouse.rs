// ── Greenhouses and alert thresholds ──

use serde::{Deserialize, Serialize};

use super::ids::GreenhouseId;
use super::sensor::SensorKind;

/// Per-greenhouse alert bounds.
///
/// Every bound is independently optional; an absent bound means "no
/// constraint on that side", never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub temperature_min: Option<f64>,
    pub temperature_max: Option<f64>,
    pub humidity_min: Option<f64>,
    pub humidity_max: Option<f64>,
    pub co2_max: Option<f64>,
    pub light_min: Option<f64>,
    pub soil_moist_min: Option<f64>,
    pub soil_temp_min: Option<f64>,
    pub water_level_min: Option<f64>,
    pub solar_voltage_min: Option<f64>,
}

impl Thresholds {
    /// Whether `value` is out of range for a sensor of `kind`.
    ///
    /// Temperature and air humidity are two-sided (either bound may be
    /// absent independently); CO2 alerts only above its maximum; the
    /// remaining kinds alert only below their minimum. Unknown kinds
    /// never alert.
    pub fn is_alert(&self, kind: SensorKind, value: f64) -> bool {
        match kind {
            SensorKind::Temperature => {
                below(self.temperature_min, value) || above(self.temperature_max, value)
            }
            SensorKind::AirHumidity => {
                below(self.humidity_min, value) || above(self.humidity_max, value)
            }
            SensorKind::Co2 => above(self.co2_max, value),
            SensorKind::Light => below(self.light_min, value),
            SensorKind::SoilMoisture => below(self.soil_moist_min, value),
            SensorKind::SoilTemperature => below(self.soil_temp_min, value),
            SensorKind::WaterLevel => below(self.water_level_min, value),
            SensorKind::SolarVoltage => below(self.solar_voltage_min, value),
            SensorKind::Unknown => false,
        }
    }
}

fn below(min: Option<f64>, value: f64) -> bool {
    min.is_some_and(|m| value < m)
}

fn above(max: Option<f64>, value: f64) -> bool {
    max.is_some_and(|m| value > m)
}

/// A greenhouse: the unit of isolation for live monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greenhouse {
    pub id: GreenhouseId,
    pub name: String,
    pub location: Option<String>,
    pub thresholds: Thresholds,
}

/// Lightweight greenhouse entry for directory listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreenhouseSummary {
    pub id: GreenhouseId,
    pub name: String,
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thresholds() -> Thresholds {
        Thresholds {
            temperature_min: Some(15.0),
            temperature_max: Some(25.0),
            humidity_min: Some(40.0),
            humidity_max: Some(80.0),
            co2_max: Some(1200.0),
            light_min: Some(300.0),
            soil_moist_min: Some(20.0),
            soil_temp_min: Some(10.0),
            water_level_min: Some(5.0),
            solar_voltage_min: Some(11.5),
        }
    }

    #[test]
    fn unconstrained_thresholds_never_alert() {
        let t = Thresholds::default();
        for value in [-1_000.0, 0.0, 1e9] {
            assert!(!t.is_alert(SensorKind::Temperature, value));
            assert!(!t.is_alert(SensorKind::Co2, value));
            assert!(!t.is_alert(SensorKind::WaterLevel, value));
        }
    }

    #[test]
    fn unknown_kind_never_alerts() {
        let t = thresholds();
        assert!(!t.is_alert(SensorKind::Unknown, -1e9));
        assert!(!t.is_alert(SensorKind::Unknown, 1e9));
    }

    #[test]
    fn temperature_alerts_on_either_side() {
        let t = thresholds();
        assert!(t.is_alert(SensorKind::Temperature, 14.9));
        assert!(!t.is_alert(SensorKind::Temperature, 15.0));
        assert!(!t.is_alert(SensorKind::Temperature, 18.0));
        assert!(!t.is_alert(SensorKind::Temperature, 25.0));
        assert!(t.is_alert(SensorKind::Temperature, 30.0));
    }

    #[test]
    fn temperature_bounds_apply_independently() {
        let only_max = Thresholds {
            temperature_max: Some(25.0),
            ..Thresholds::default()
        };
        assert!(!only_max.is_alert(SensorKind::Temperature, -40.0));
        assert!(only_max.is_alert(SensorKind::Temperature, 26.0));

        let only_min = Thresholds {
            temperature_min: Some(15.0),
            ..Thresholds::default()
        };
        assert!(only_min.is_alert(SensorKind::Temperature, 14.0));
        assert!(!only_min.is_alert(SensorKind::Temperature, 99.0));
    }

    #[test]
    fn humidity_alerts_on_either_side() {
        let t = thresholds();
        assert!(t.is_alert(SensorKind::AirHumidity, 39.0));
        assert!(!t.is_alert(SensorKind::AirHumidity, 60.0));
        assert!(t.is_alert(SensorKind::AirHumidity, 81.0));
    }

    #[test]
    fn co2_alerts_only_above_max() {
        let t = thresholds();
        assert!(!t.is_alert(SensorKind::Co2, 0.0));
        assert!(!t.is_alert(SensorKind::Co2, 1200.0));
        assert!(t.is_alert(SensorKind::Co2, 1201.0));
    }

    #[test]
    fn floor_only_kinds_alert_below_min() {
        let t = thresholds();
        assert!(t.is_alert(SensorKind::Light, 299.0));
        assert!(!t.is_alert(SensorKind::Light, 300.0));
        assert!(t.is_alert(SensorKind::SoilMoisture, 19.9));
        assert!(t.is_alert(SensorKind::SoilTemperature, 9.0));
        assert!(t.is_alert(SensorKind::WaterLevel, 4.0));
        assert!(t.is_alert(SensorKind::SolarVoltage, 11.0));
        assert!(!t.is_alert(SensorKind::SolarVoltage, 12.6));
    }
}
