// ── Core identity types ──
//
// The backend uses integer primary keys everywhere. Newtypes keep a
// greenhouse id from being passed where a sensor id belongs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of a greenhouse (the reconciler's scope key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GreenhouseId(i64);

impl GreenhouseId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GreenhouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for GreenhouseId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl FromStr for GreenhouseId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Identifier of a sensor, unique within its greenhouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SensorId(i64);

impl SensorId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SensorId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Identifier of a camera, unique within its greenhouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraId(i64);

impl CameraId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CameraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CameraId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn greenhouse_id_display() {
        assert_eq!(GreenhouseId::new(42).to_string(), "42");
    }

    #[test]
    fn greenhouse_id_from_str() {
        let id: GreenhouseId = "7".parse().unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn greenhouse_id_from_str_rejects_garbage() {
        assert!("seven".parse::<GreenhouseId>().is_err());
    }

    #[test]
    fn sensor_id_round_trip() {
        let id = SensorId::from(9);
        assert_eq!(id.get(), 9);
        assert_eq!(id, SensorId::new(9));
    }
}
