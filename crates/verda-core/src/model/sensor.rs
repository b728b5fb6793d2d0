// ── Sensors and readings ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::SensorId;

/// Sensor category, as the backend's closed set of type codes.
///
/// Codes arriving over the wire that are not in this set map to
/// [`Unknown`](Self::Unknown): never alerting, invisible under inclusion
/// policies, visible under exclusion policies. Serialization goes
/// through the wire codes in both directions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(from = "String", into = "String")]
pub enum SensorKind {
    #[strum(serialize = "TEMP")]
    Temperature,

    #[strum(serialize = "AIR_HUM")]
    AirHumidity,

    #[strum(serialize = "CO2")]
    Co2,

    #[strum(serialize = "LIGHT")]
    Light,

    #[strum(serialize = "SOIL_MOIST")]
    SoilMoisture,

    #[strum(serialize = "SOIL_TEMP")]
    SoilTemperature,

    #[strum(serialize = "WATER_LVL")]
    WaterLevel,

    #[strum(serialize = "SOLAR_VOLT")]
    SolarVoltage,

    #[strum(serialize = "UNKNOWN")]
    Unknown,
}

impl From<String> for SensorKind {
    fn from(code: String) -> Self {
        Self::parse_code(&code)
    }
}

impl From<SensorKind> for String {
    fn from(kind: SensorKind) -> Self {
        kind.to_string()
    }
}

impl SensorKind {
    /// Parse a wire type code, mapping unrecognized codes to `Unknown`.
    pub fn parse_code(code: &str) -> Self {
        code.parse().unwrap_or(Self::Unknown)
    }

    /// Display unit for readings of this kind.
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Temperature | Self::SoilTemperature => "°C",
            Self::AirHumidity => "% RH",
            Self::Co2 => "ppm",
            Self::Light => "Lux",
            Self::SoilMoisture => "% VWC",
            Self::WaterLevel => "L",
            Self::SolarVoltage => "V",
            Self::Unknown => "",
        }
    }
}

/// A single measurement: value plus the instant it was taken.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

/// A sensor tracked within a greenhouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    pub id: SensorId,
    pub kind: SensorKind,
    pub name: Option<String>,
    pub description: Option<String>,
    /// `None` until the sensor has reported at least once.
    pub latest_reading: Option<Reading>,
}

impl Sensor {
    /// Name to show in lists: the configured name, or the type code.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.kind.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_codes() {
        assert_eq!(SensorKind::parse_code("TEMP"), SensorKind::Temperature);
        assert_eq!(SensorKind::parse_code("AIR_HUM"), SensorKind::AirHumidity);
        assert_eq!(SensorKind::parse_code("WATER_LVL"), SensorKind::WaterLevel);
        assert_eq!(SensorKind::parse_code("SOLAR_VOLT"), SensorKind::SolarVoltage);
    }

    #[test]
    fn parse_unknown_code() {
        assert_eq!(SensorKind::parse_code("PH_LEVEL"), SensorKind::Unknown);
        assert_eq!(SensorKind::parse_code(""), SensorKind::Unknown);
    }

    #[test]
    fn kind_display_is_the_wire_code() {
        assert_eq!(SensorKind::Temperature.to_string(), "TEMP");
        assert_eq!(SensorKind::SoilMoisture.to_string(), "SOIL_MOIST");
    }

    #[test]
    fn serde_round_trips_wire_codes() {
        let kind: SensorKind = serde_json::from_str("\"CO2\"").unwrap();
        assert_eq!(kind, SensorKind::Co2);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"CO2\"");
    }

    #[test]
    fn serde_maps_unrecognized_codes_to_unknown() {
        let kind: SensorKind = serde_json::from_str("\"PH_LEVEL\"").unwrap();
        assert_eq!(kind, SensorKind::Unknown);
    }

    #[test]
    fn units() {
        assert_eq!(SensorKind::Temperature.unit(), "°C");
        assert_eq!(SensorKind::Co2.unit(), "ppm");
        assert_eq!(SensorKind::Unknown.unit(), "");
    }

    #[test]
    fn display_name_falls_back_to_kind() {
        let sensor = Sensor {
            id: SensorId::new(1),
            kind: SensorKind::Light,
            name: None,
            description: None,
            latest_reading: None,
        };
        assert_eq!(sensor.display_name(), "LIGHT");
    }
}
