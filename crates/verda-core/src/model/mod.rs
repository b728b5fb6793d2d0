// ── Domain model ──

mod camera;
mod greenhouse;
mod ids;
mod sensor;

pub use camera::{Actuator, ActuatorStatus, Camera, Overview};
pub use greenhouse::{Greenhouse, GreenhouseSummary, Thresholds};
pub use ids::{CameraId, GreenhouseId, SensorId};
pub use sensor::{Reading, Sensor, SensorKind};
