//! Reactive data layer between `verda-api` and UI consumers.
//!
//! This crate owns the domain model and the live reconciliation logic
//! for the Verda workspace:
//!
//! - **[`LiveMonitor`]** — Central facade managing one greenhouse scope:
//!   [`start()`](LiveMonitor::start) fetches the snapshot and opens the
//!   push channel concurrently, buffering early updates until the
//!   snapshot seeds; [`stop()`](LiveMonitor::stop) releases channel and
//!   timers through a single teardown routine.
//!
//! - **[`ViewPolicy`]** — Page-scoped sensor-type filtering (inclusion
//!   or exclusion), applied to the snapshot and to every live update.
//!
//! - **[`Thresholds`]** — Per-greenhouse alert bounds with the pure
//!   out-of-range evaluator; alert flags are recomputed at view time,
//!   never cached.
//!
//! - **[`SensorStream`]** — Subscription handle over the monitored
//!   collection. Exposes `current()` / `latest()` / `changed()` for
//!   reactive rendering.
//!
//! - **Domain model** ([`model`]) — Canonical types (`Sensor`,
//!   `Greenhouse`, `Camera`, `Actuator`, ...) with integer-id newtypes
//!   matching the backend's primary keys.

pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod monitor;
pub mod policy;
pub mod stream;

mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{MonitorConfig, TlsVerification};
pub use error::CoreError;
pub use monitor::{LiveMonitor, SensorView, ViewState};
pub use policy::ViewPolicy;
pub use stream::SensorStream;

// Channel types shared with the api crate.
pub use verda_api::live::{ChannelState, ReconnectConfig, SensorUpdate};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Actuator,
    ActuatorStatus,
    Camera,
    CameraId,
    Greenhouse,
    GreenhouseId,
    GreenhouseSummary,
    Overview,
    Reading,
    Sensor,
    SensorId,
    SensorKind,
    Thresholds,
};
