// ── Live greenhouse monitor ──
//
// The reconciliation core: merges a REST snapshot of one greenhouse's
// sensors with the unordered stream of push updates, filters both by
// the page's view policy, and exposes a consistent, alert-annotated
// view. Channel failures self-heal through the reconnect loop; snapshot
// failures are terminal for the scope until `start` is called again.

use std::sync::{Arc, Mutex as StdMutex, RwLock};

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use verda_api::live::{ChannelState, LiveChannelHandle, SensorUpdate};
use verda_api::{ApiClient, TlsMode, TransportConfig};

use crate::config::{MonitorConfig, TlsVerification};
use crate::error::CoreError;
use crate::model::{
    Camera, Greenhouse, GreenhouseId, GreenhouseSummary, Overview, Reading, Sensor, SensorId,
    SensorKind,
};
use crate::store::SensorCollection;
use crate::stream::SensorStream;

// ── View types ───────────────────────────────────────────────────────

/// One sensor plus its alert flag, recomputed from the current
/// thresholds at view time (never cached).
#[derive(Debug, Clone, serde::Serialize)]
pub struct SensorView {
    pub sensor: Arc<Sensor>,
    pub alert: bool,
}

/// Point-in-time view of the monitored greenhouse: the ordered sensor
/// sequence with alert flags, and the channel status for UI feedback.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ViewState {
    pub greenhouse: Option<Arc<Greenhouse>>,
    pub sensors: Vec<SensorView>,
    pub channel: ChannelState,
}

// ── LiveMonitor ──────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc`. One monitor tracks at most one
/// greenhouse at a time; calling [`start`](Self::start) with a new id
/// tears the previous scope down first (channel included), so at most
/// one live channel exists per monitor at any moment.
#[derive(Clone)]
pub struct LiveMonitor {
    inner: Arc<MonitorInner>,
}

struct MonitorInner {
    config: MonitorConfig,
    api: ApiClient,
    collection: SensorCollection,
    greenhouse: RwLock<Option<Arc<Greenhouse>>>,
    channel_state: watch::Sender<ChannelState>,
    pending: StdMutex<PendingUpdates>,
    lifecycle: Mutex<Option<ScopeLifecycle>>,
}

/// Where inbound updates go, relative to the snapshot lifecycle.
enum PendingUpdates {
    /// No scope: updates are dropped.
    Inactive,
    /// Scope started but the snapshot has not seeded yet: updates are
    /// buffered and drained (in arrival order) once it lands.
    Buffering(Vec<SensorUpdate>),
    /// Snapshot seeded: updates apply directly.
    Live,
}

/// Owned resources of the active scope. Tearing these down is the
/// single release path for every exit: explicit stop, scope change,
/// and snapshot failure all run the same routine.
struct ScopeLifecycle {
    greenhouse_id: GreenhouseId,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl LiveMonitor {
    /// Create a monitor from configuration. Does NOT fetch anything --
    /// call [`start`](Self::start) to attach it to a greenhouse.
    pub fn new(config: MonitorConfig) -> Result<Self, CoreError> {
        let transport = build_transport(&config);
        let api = ApiClient::new(config.base_url.clone(), &config.token, &transport)?;
        let (channel_state, _) = watch::channel(ChannelState::Idle);

        Ok(Self {
            inner: Arc::new(MonitorInner {
                config,
                api,
                collection: SensorCollection::new(),
                greenhouse: RwLock::new(None),
                channel_state,
                pending: StdMutex::new(PendingUpdates::Inactive),
                lifecycle: Mutex::new(None),
            }),
        })
    }

    /// Access the monitor configuration.
    pub fn config(&self) -> &MonitorConfig {
        &self.inner.config
    }

    // ── Scope lifecycle ──────────────────────────────────────────────

    /// Attach the monitor to a greenhouse.
    ///
    /// Tears down any previous scope, then starts the live channel and
    /// the snapshot fetch concurrently. Updates arriving before the
    /// snapshot seeds are buffered and applied afterwards, so a
    /// legitimate first update is never dropped. On snapshot failure
    /// the whole scope (channel included) is torn down and the error is
    /// returned; the caller retries by calling `start` again.
    ///
    /// Calls are serialized: a `start` racing an earlier one waits for
    /// it, and a snapshot response belonging to an abandoned scope can
    /// never leak into a newer one.
    pub async fn start(&self, greenhouse_id: GreenhouseId) -> Result<(), CoreError> {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        teardown(&mut lifecycle, &self.inner).await;

        let cancel = CancellationToken::new();
        let mut handles = Vec::new();

        if self.inner.config.live_enabled {
            let ws_url = self.inner.api.ws_url(greenhouse_id.get())?;
            let channel = LiveChannelHandle::connect(
                ws_url,
                self.inner.config.reconnect.clone(),
                cancel.clone(),
            );
            handles.push(tokio::spawn(state_forward_task(
                Arc::clone(&self.inner),
                channel.state(),
                cancel.clone(),
            )));
            handles.push(tokio::spawn(apply_task(
                Arc::clone(&self.inner),
                channel.subscribe(),
                cancel.clone(),
            )));
        }

        *self.inner.pending.lock().expect("pending lock poisoned") =
            PendingUpdates::Buffering(Vec::new());

        // Register the scope before the fetch so that even an abandoned
        // `start` future leaves something the next teardown can cancel.
        *lifecycle = Some(ScopeLifecycle {
            greenhouse_id,
            cancel,
            handles,
        });

        let (greenhouse_res, sensors_res) = tokio::join!(
            self.inner.api.get_greenhouse(greenhouse_id.get()),
            self.inner.api.list_sensors(greenhouse_id.get()),
        );
        let (detail, records) = match (greenhouse_res, sensors_res) {
            (Ok(detail), Ok(records)) => (detail, records),
            (Err(e), _) | (_, Err(e)) => {
                warn!(greenhouse = %greenhouse_id, error = %e, "snapshot load failed");
                teardown(&mut lifecycle, &self.inner).await;
                return Err(e.into());
            }
        };

        let greenhouse = Arc::new(Greenhouse::from(detail));
        let sensors: Vec<Sensor> = records
            .into_iter()
            .map(Sensor::from)
            .filter(|s| self.inner.config.policy.is_visible(s.kind))
            .collect();

        self.inner.seed_scope(greenhouse, sensors);

        info!(
            greenhouse = %greenhouse_id,
            sensors = self.inner.collection.len(),
            "snapshot seeded"
        );
        Ok(())
    }

    /// Detach from the current greenhouse and discard all scope state.
    ///
    /// Closes the channel cleanly, cancels any pending reconnect timer,
    /// and empties the collection. Safe to call when nothing is
    /// attached; the monitor returns to idle either way.
    pub async fn stop(&self) {
        let mut lifecycle = self.inner.lifecycle.lock().await;
        teardown(&mut lifecycle, &self.inner).await;
    }

    // ── Reconciliation ───────────────────────────────────────────────

    /// Apply one partial update to the tracked collection.
    ///
    /// Updates whose sensor type fails the view policy are discarded;
    /// updates for ids absent from the snapshot are ignored rather than
    /// inserted. The channel feeds this same path internally.
    pub fn apply_update(&self, update: SensorUpdate) {
        self.inner.reconcile(update);
    }

    // ── State observation ────────────────────────────────────────────

    /// The current view: ordered sensors with recomputed alert flags,
    /// plus the channel status.
    pub fn current(&self) -> ViewState {
        let greenhouse = self
            .inner
            .greenhouse
            .read()
            .expect("greenhouse lock poisoned")
            .clone();
        let channel = self.inner.channel_state.borrow().clone();

        let snapshot = self.inner.collection.snapshot();
        let sensors = snapshot
            .iter()
            .map(|sensor| {
                let alert = match (&greenhouse, sensor.latest_reading.as_ref()) {
                    (Some(g), Some(reading)) => g.thresholds.is_alert(sensor.kind, reading.value),
                    _ => false,
                };
                SensorView {
                    sensor: Arc::clone(sensor),
                    alert,
                }
            })
            .collect();

        ViewState {
            greenhouse,
            sensors,
            channel,
        }
    }

    /// The attached greenhouse, once the snapshot has seeded.
    pub fn greenhouse(&self) -> Option<Arc<Greenhouse>> {
        self.inner
            .greenhouse
            .read()
            .expect("greenhouse lock poisoned")
            .clone()
    }

    /// Subscribe to sensor collection changes.
    pub fn sensors(&self) -> SensorStream {
        SensorStream::new(self.inner.collection.subscribe())
    }

    /// Subscribe to channel status changes.
    pub fn channel_state(&self) -> watch::Receiver<ChannelState> {
        self.inner.channel_state.subscribe()
    }

    // ── One-shot directory fetches ───────────────────────────────────
    //
    // Reads outside the live reconciliation path, for listing screens.

    /// List the caller's greenhouses.
    pub async fn list_greenhouses(&self) -> Result<Vec<GreenhouseSummary>, CoreError> {
        let records = self.inner.api.list_greenhouses().await?;
        Ok(records.into_iter().map(GreenhouseSummary::from).collect())
    }

    /// Fetch the overview card data for one greenhouse.
    pub async fn fetch_overview(&self, greenhouse_id: GreenhouseId) -> Result<Overview, CoreError> {
        let record = self.inner.api.get_overview(greenhouse_id.get()).await?;
        Ok(Overview::from(record))
    }

    /// List the cameras installed in one greenhouse.
    pub async fn list_cameras(&self, greenhouse_id: GreenhouseId) -> Result<Vec<Camera>, CoreError> {
        let records = self.inner.api.list_cameras(greenhouse_id.get()).await?;
        Ok(records.into_iter().map(Camera::from).collect())
    }
}

impl MonitorInner {
    /// Seed the scope: publish the greenhouse, replace the collection,
    /// and drain updates buffered while the snapshot was in flight.
    ///
    /// The pending lock is held across the drain so updates arriving
    /// concurrently queue behind it and apply afterwards, preserving
    /// delivery order (last write per sensor wins).
    fn seed_scope(&self, greenhouse: Arc<Greenhouse>, sensors: Vec<Sensor>) {
        *self.greenhouse.write().expect("greenhouse lock poisoned") = Some(greenhouse);
        self.collection.seed(sensors);

        let mut pending = self.pending.lock().expect("pending lock poisoned");
        if let PendingUpdates::Buffering(queue) =
            std::mem::replace(&mut *pending, PendingUpdates::Live)
        {
            if !queue.is_empty() {
                debug!(buffered = queue.len(), "applying updates buffered before snapshot");
            }
            for update in queue {
                self.reconcile_live(update);
            }
        }
    }

    /// Route one update according to the snapshot lifecycle.
    fn reconcile(&self, update: SensorUpdate) {
        {
            let mut pending = self.pending.lock().expect("pending lock poisoned");
            match &mut *pending {
                PendingUpdates::Inactive => {
                    trace!(sensor = update.sensor_id, "update with no active scope, dropping");
                    return;
                }
                PendingUpdates::Buffering(queue) => {
                    queue.push(update);
                    return;
                }
                PendingUpdates::Live => {}
            }
        }
        self.reconcile_live(update);
    }

    /// Apply one update against the seeded collection.
    fn reconcile_live(&self, update: SensorUpdate) {
        let kind = SensorKind::parse_code(&update.sensor_type);
        if !self.config.policy.is_visible(kind) {
            trace!(
                sensor = update.sensor_id,
                kind = %kind,
                "update outside view policy, ignoring"
            );
            return;
        }

        let id = SensorId::new(update.sensor_id);
        let reading = Reading::from(update.latest_reading);
        if !self.collection.update_reading(id, reading) {
            debug!(sensor = %id, "update for sensor missing from snapshot, ignoring");
        }
    }
}

// ── Scope teardown ───────────────────────────────────────────────────

/// Cancel and join the scope's tasks, then discard all scope state.
/// Every exit path funnels through here.
async fn teardown(lifecycle: &mut Option<ScopeLifecycle>, inner: &MonitorInner) {
    let Some(scope) = lifecycle.take() else { return };

    scope.cancel.cancel();
    for handle in scope.handles {
        let _ = handle.await;
    }

    *inner.pending.lock().expect("pending lock poisoned") = PendingUpdates::Inactive;
    inner.collection.clear();
    *inner.greenhouse.write().expect("greenhouse lock poisoned") = None;
    inner.channel_state.send_replace(ChannelState::Idle);

    debug!(greenhouse = %scope.greenhouse_id, "scope torn down");
}

// ── Background tasks ─────────────────────────────────────────────────

/// Mirror the channel task's state into the monitor-level watch.
async fn state_forward_task(
    inner: Arc<MonitorInner>,
    mut rx: watch::Receiver<ChannelState>,
    cancel: CancellationToken,
) {
    inner.channel_state.send_replace(rx.borrow().clone());

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                inner.channel_state.send_replace(state);
            }
        }
    }
}

/// Feed decoded channel updates into the reconciler.
async fn apply_task(
    inner: Arc<MonitorInner>,
    mut rx: broadcast::Receiver<SensorUpdate>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            update = rx.recv() => match update {
                Ok(update) => inner.reconcile(update),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "live updates lagged, some readings were skipped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// Build a [`TransportConfig`] from the monitor configuration.
fn build_transport(config: &MonitorConfig) -> TransportConfig {
    TransportConfig {
        tls: tls_to_transport(&config.tls),
        timeout: config.timeout,
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Thresholds;
    use crate::policy::ViewPolicy;
    use chrono::{TimeZone, Utc};
    use secrecy::SecretString;
    use url::Url;
    use verda_api::models::ReadingRecord;

    fn monitor(policy: ViewPolicy) -> LiveMonitor {
        let mut config = MonitorConfig::new(
            Url::parse("http://localhost:8000").unwrap(),
            SecretString::from("test-token"),
        );
        config.policy = policy;
        config.live_enabled = false;
        LiveMonitor::new(config).unwrap()
    }

    fn greenhouse() -> Arc<Greenhouse> {
        Arc::new(Greenhouse {
            id: GreenhouseId::new(1),
            name: "Herbs".into(),
            location: None,
            thresholds: Thresholds {
                temperature_min: Some(15.0),
                temperature_max: Some(25.0),
                ..Thresholds::default()
            },
        })
    }

    fn sensor(id: i64, kind: SensorKind, value: f64) -> Sensor {
        Sensor {
            id: SensorId::new(id),
            kind,
            name: None,
            description: None,
            latest_reading: Some(Reading {
                value,
                timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
            }),
        }
    }

    fn update(sensor_id: i64, sensor_type: &str, value: f64) -> SensorUpdate {
        SensorUpdate {
            sensor_id,
            sensor_type: sensor_type.into(),
            latest_reading: ReadingRecord {
                value,
                timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
            },
        }
    }

    #[tokio::test]
    async fn updates_with_no_scope_are_dropped() {
        let monitor = monitor(ViewPolicy::all());
        monitor.apply_update(update(7, "TEMP", 30.0));

        let view = monitor.current();
        assert!(view.sensors.is_empty());
        assert_eq!(view.channel, ChannelState::Idle);
    }

    #[tokio::test]
    async fn updates_buffered_before_seed_apply_after_it() {
        let monitor = monitor(ViewPolicy::all());

        // Scope started, snapshot still in flight.
        *monitor.inner.pending.lock().unwrap() = PendingUpdates::Buffering(Vec::new());

        monitor.apply_update(update(7, "TEMP", 21.0));
        monitor.apply_update(update(7, "TEMP", 30.0));
        assert!(monitor.current().sensors.is_empty(), "nothing seeded yet");

        monitor
            .inner
            .seed_scope(greenhouse(), vec![sensor(7, SensorKind::Temperature, 18.0)]);

        let view = monitor.current();
        assert_eq!(view.sensors.len(), 1);
        let latest = view.sensors[0].sensor.latest_reading.unwrap();
        assert!(
            (latest.value - 30.0).abs() < f64::EPSILON,
            "last buffered write wins"
        );
        assert!(view.sensors[0].alert, "30.0 exceeds temperature_max");
    }

    #[tokio::test]
    async fn buffered_updates_respect_the_view_policy() {
        let monitor = monitor(ViewPolicy::environment());
        *monitor.inner.pending.lock().unwrap() = PendingUpdates::Buffering(Vec::new());

        monitor.apply_update(update(8, "WATER_LVL", 2.0));
        monitor
            .inner
            .seed_scope(greenhouse(), vec![sensor(7, SensorKind::Temperature, 18.0)]);

        let view = monitor.current();
        assert_eq!(view.sensors.len(), 1);
        assert_eq!(view.sensors[0].sensor.id, SensorId::new(7));
    }

    #[tokio::test]
    async fn alerts_recompute_on_every_view() {
        let monitor = monitor(ViewPolicy::all());
        *monitor.inner.pending.lock().unwrap() = PendingUpdates::Buffering(Vec::new());
        monitor
            .inner
            .seed_scope(greenhouse(), vec![sensor(7, SensorKind::Temperature, 18.0)]);

        assert!(!monitor.current().sensors[0].alert);

        monitor.apply_update(update(7, "TEMP", 30.0));
        assert!(monitor.current().sensors[0].alert);

        monitor.apply_update(update(7, "TEMP", 20.0));
        assert!(!monitor.current().sensors[0].alert);
    }

    #[tokio::test]
    async fn stop_discards_all_scope_state() {
        let monitor = monitor(ViewPolicy::all());
        *monitor.inner.pending.lock().unwrap() = PendingUpdates::Buffering(Vec::new());
        monitor
            .inner
            .seed_scope(greenhouse(), vec![sensor(7, SensorKind::Temperature, 18.0)]);

        // No lifecycle registered in this test setup; emulate one.
        *monitor.inner.lifecycle.lock().await = Some(ScopeLifecycle {
            greenhouse_id: GreenhouseId::new(1),
            cancel: CancellationToken::new(),
            handles: Vec::new(),
        });

        monitor.stop().await;

        let view = monitor.current();
        assert!(view.sensors.is_empty());
        assert!(view.greenhouse.is_none());
        assert_eq!(view.channel, ChannelState::Idle);

        // Post-stop updates are dropped, not buffered.
        monitor.apply_update(update(7, "TEMP", 30.0));
        assert!(monitor.current().sensors.is_empty());
    }
}
