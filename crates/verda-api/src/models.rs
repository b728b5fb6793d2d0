// Wire types for the backend's REST surface.
//
// These mirror the JSON the server actually sends. Domain conversion
// (typed sensor kinds, alert evaluation) lives in verda-core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Greenhouses ─────────────────────────────────────────────────────

/// One entry from `GET api/greenhouses/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreenhouseSummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
}

/// Full greenhouse record from `GET api/greenhouses/{id}/`.
///
/// The alert bounds are nested under `threshold`; a greenhouse without
/// configured bounds sends `null` (or omits the field entirely).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GreenhouseDetail {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub threshold: Option<ThresholdRecord>,
}

/// Per-greenhouse alert bounds. Every bound is independently optional;
/// `null` means "no constraint on that side", never zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdRecord {
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

// ── Sensors ─────────────────────────────────────────────────────────

/// One entry from `GET api/greenhouses/{id}/sensors/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorRecord {
    pub id: i64,
    /// Sensor type code, e.g. `"TEMP"`, `"AIR_HUM"`, `"WATER_LVL"`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// `null` until the sensor has reported at least once.
    #[serde(default)]
    pub latest_reading: Option<ReadingRecord>,
}

/// A single measurement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

// ── Cameras ─────────────────────────────────────────────────────────

/// One entry from `GET api/greenhouses/{id}/cameras/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response of `GET api/greenhouses/{id}/live-feed/?camera_id=`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveFeed {
    #[serde(default)]
    pub stream_url: Option<String>,
}

/// One entry from `GET api/greenhouses/{id}/recorded-footage/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingRecord {
    pub id: i64,
    #[serde(default)]
    pub camera_id: Option<i64>,
    pub video_url: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

// ── Overview ────────────────────────────────────────────────────────

/// Response of `GET api/greenhouses/{id}/overview/`: greenhouse header,
/// actuator states, and the server-computed active alert messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewRecord {
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub actuators: Vec<ActuatorRecord>,
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// One actuator with its most recent status, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub actuator_type: String,
    #[serde(default)]
    pub latest_status: Option<ActuatorStatusRecord>,
}

/// Actuator status: `"On"`, `"Off"`, or a free-form value such as `"75%"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorStatusRecord {
    pub status_value: String,
    pub timestamp: DateTime<Utc>,
}
