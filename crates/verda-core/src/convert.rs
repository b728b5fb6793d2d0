// ── Wire → domain conversions ──
//
// The api crate speaks the backend's JSON shapes; everything above it
// speaks the domain model. All translation happens here.

use verda_api::models::{
    ActuatorRecord, ActuatorStatusRecord, CameraRecord, GreenhouseDetail, GreenhouseSummary,
    OverviewRecord, ReadingRecord, SensorRecord, ThresholdRecord,
};

use crate::model::{
    Actuator, ActuatorStatus, Camera, CameraId, Greenhouse, GreenhouseId, Overview, Reading,
    Sensor, SensorId, SensorKind, Thresholds,
};

impl From<ReadingRecord> for Reading {
    fn from(r: ReadingRecord) -> Self {
        Self {
            value: r.value,
            timestamp: r.timestamp,
        }
    }
}

impl From<SensorRecord> for Sensor {
    fn from(r: SensorRecord) -> Self {
        Self {
            id: SensorId::new(r.id),
            kind: SensorKind::parse_code(&r.kind),
            name: r.name,
            description: r.description,
            latest_reading: r.latest_reading.map(Reading::from),
        }
    }
}

impl From<ThresholdRecord> for Thresholds {
    fn from(r: ThresholdRecord) -> Self {
        Self {
            temperature_min: r.temperature_min,
            temperature_max: r.temperature_max,
            humidity_min: r.humidity_min,
            humidity_max: r.humidity_max,
            co2_max: r.co2_max,
            light_min: r.light_min,
            soil_moist_min: r.soil_moist_min,
            soil_temp_min: r.soil_temp_min,
            water_level_min: r.water_level_min,
            solar_voltage_min: r.solar_voltage_min,
        }
    }
}

impl From<GreenhouseDetail> for Greenhouse {
    fn from(r: GreenhouseDetail) -> Self {
        Self {
            id: GreenhouseId::new(r.id),
            name: r.name,
            location: r.location,
            // No configured thresholds means no constraints anywhere.
            thresholds: r.threshold.map(Thresholds::from).unwrap_or_default(),
        }
    }
}

impl From<GreenhouseSummary> for crate::model::GreenhouseSummary {
    fn from(r: GreenhouseSummary) -> Self {
        Self {
            id: GreenhouseId::new(r.id),
            name: r.name,
            location: r.location,
        }
    }
}

impl From<CameraRecord> for Camera {
    fn from(r: CameraRecord) -> Self {
        Self {
            id: CameraId::new(r.id),
            name: r.name,
            description: r.description,
        }
    }
}

impl From<ActuatorStatusRecord> for ActuatorStatus {
    fn from(r: ActuatorStatusRecord) -> Self {
        Self {
            value: r.status_value,
            timestamp: r.timestamp,
        }
    }
}

impl From<ActuatorRecord> for Actuator {
    fn from(r: ActuatorRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            actuator_type: r.actuator_type,
            latest_status: r.latest_status.map(ActuatorStatus::from),
        }
    }
}

impl From<OverviewRecord> for Overview {
    fn from(r: OverviewRecord) -> Self {
        Self {
            name: r.name,
            location: r.location,
            actuators: r.actuators.into_iter().map(Actuator::from).collect(),
            alerts: r.alerts,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn sensor_record_with_unknown_type_converts_to_unknown_kind() {
        let record: SensorRecord = serde_json::from_value(serde_json::json!({
            "id": 5,
            "type": "PH_LEVEL",
            "name": "pH probe",
            "description": null,
            "latest_reading": null
        }))
        .unwrap();

        let sensor = Sensor::from(record);
        assert_eq!(sensor.id, SensorId::new(5));
        assert_eq!(sensor.kind, SensorKind::Unknown);
        assert!(sensor.latest_reading.is_none());
    }

    #[test]
    fn greenhouse_without_thresholds_is_unconstrained() {
        let record: GreenhouseDetail = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Bare",
            "location": null,
            "threshold": null
        }))
        .unwrap();

        let greenhouse = Greenhouse::from(record);
        assert_eq!(greenhouse.thresholds, Thresholds::default());
        assert!(!greenhouse.thresholds.is_alert(SensorKind::Temperature, 999.0));
    }

    #[test]
    fn greenhouse_thresholds_carry_over() {
        let record: GreenhouseDetail = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Herbs",
            "location": "Rooftop",
            "threshold": { "temperature_min": 15.0, "temperature_max": 25.0 }
        }))
        .unwrap();

        let greenhouse = Greenhouse::from(record);
        assert_eq!(greenhouse.thresholds.temperature_min, Some(15.0));
        assert!(greenhouse.thresholds.is_alert(SensorKind::Temperature, 30.0));
    }
}
