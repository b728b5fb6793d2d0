// ── Cameras and actuators ──
//
// Read-only entities surfaced alongside sensors: cameras for the
// security pages, actuators and server-computed alerts for the
// overview card.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::CameraId;

/// A camera installed in a greenhouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: CameraId,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Camera {
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Camera {}", self.id))
    }
}

/// Most recent status reported by an actuator: `"On"`, `"Off"`, or a
/// free-form value such as `"75%"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActuatorStatus {
    pub value: String,
    pub timestamp: DateTime<Utc>,
}

/// An actuator (fan, valve, shade, ...) with its latest status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actuator {
    pub id: i64,
    pub name: Option<String>,
    pub actuator_type: String,
    pub latest_status: Option<ActuatorStatus>,
}

impl Actuator {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.actuator_type.clone())
    }
}

/// Overview card data: greenhouse header, actuator states, and the
/// server-computed active alert messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub name: String,
    pub location: Option<String>,
    pub actuators: Vec<Actuator>,
    pub alerts: Vec<String>,
}
