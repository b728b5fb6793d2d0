// ── Ordered reactive sensor collection ──
//
// Storage for one scope's sensors with push-based change notification
// via `watch` channels. Insertion order is the snapshot's order and is
// preserved across reading updates, so views render in a stable order.

use std::sync::{Arc, RwLock};

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::{Reading, Sensor, SensorId};

/// Reactive, insertion-ordered collection of one scope's sensors.
///
/// Every mutation bumps a version counter and republishes the snapshot
/// that subscribers receive. Updating a reading replaces the sensor's
/// entry in place; there is deliberately no path that inserts a sensor
/// outside [`seed`](Self::seed) -- entity existence is authoritative
/// from the snapshot only.
pub(crate) struct SensorCollection {
    by_id: RwLock<IndexMap<SensorId, Arc<Sensor>>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on mutation for efficient subscription.
    snapshot: watch::Sender<Arc<Vec<Arc<Sensor>>>>,
}

impl SensorCollection {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));

        Self {
            by_id: RwLock::new(IndexMap::new()),
            version,
            snapshot,
        }
    }

    /// Replace the whole collection, preserving the given order.
    ///
    /// Later duplicates of an id win over earlier ones, so the
    /// collection never holds two entries with the same id.
    pub(crate) fn seed(&self, sensors: Vec<Sensor>) {
        {
            let mut map = self.by_id.write().expect("collection lock poisoned");
            map.clear();
            for sensor in sensors {
                map.insert(sensor.id, Arc::new(sensor));
            }
        }
        self.rebuild_snapshot();
        self.bump_version();
    }

    /// Replace one sensor's latest reading wholesale (last write wins).
    ///
    /// Returns `false` when the id is not part of the collection; the
    /// update is then dropped without inserting anything.
    pub(crate) fn update_reading(&self, id: SensorId, reading: Reading) -> bool {
        {
            let mut map = self.by_id.write().expect("collection lock poisoned");
            let Some(entry) = map.get_mut(&id) else {
                return false;
            };
            let mut sensor = (**entry).clone();
            sensor.latest_reading = Some(reading);
            *entry = Arc::new(sensor);
        }
        self.rebuild_snapshot();
        self.bump_version();
        true
    }

    /// Look up one sensor by id.
    #[allow(dead_code)]
    pub(crate) fn get(&self, id: SensorId) -> Option<Arc<Sensor>> {
        self.by_id
            .read()
            .expect("collection lock poisoned")
            .get(&id)
            .map(Arc::clone)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<Sensor>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<Sensor>>>> {
        self.snapshot.subscribe()
    }

    /// Remove all sensors.
    pub(crate) fn clear(&self) {
        self.by_id.write().expect("collection lock poisoned").clear();
        self.rebuild_snapshot();
        self.bump_version();
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.read().expect("collection lock poisoned").len()
    }

    #[allow(dead_code)]
    pub(crate) fn is_empty(&self) -> bool {
        self.by_id.read().expect("collection lock poisoned").is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Collect all values in order and broadcast to subscribers.
    fn rebuild_snapshot(&self) {
        let values: Vec<Arc<Sensor>> = self
            .by_id
            .read()
            .expect("collection lock poisoned")
            .values()
            .map(Arc::clone)
            .collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
    }

    /// Increment the version counter.
    fn bump_version(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::SensorKind;
    use chrono::{TimeZone, Utc};

    fn sensor(id: i64, kind: SensorKind, value: Option<f64>) -> Sensor {
        Sensor {
            id: SensorId::new(id),
            kind,
            name: None,
            description: None,
            latest_reading: value.map(|v| Reading {
                value: v,
                timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
            }),
        }
    }

    fn reading(value: f64) -> Reading {
        Reading {
            value,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn seed_preserves_order() {
        let col = SensorCollection::new();
        col.seed(vec![
            sensor(3, SensorKind::Temperature, Some(18.0)),
            sensor(1, SensorKind::Co2, None),
            sensor(2, SensorKind::Light, Some(400.0)),
        ]);

        let snap = col.snapshot();
        let ids: Vec<i64> = snap.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn update_reading_is_last_write_wins() {
        let col = SensorCollection::new();
        col.seed(vec![sensor(7, SensorKind::Temperature, Some(18.0))]);

        assert!(col.update_reading(SensorId::new(7), reading(21.0)));
        assert!(col.update_reading(SensorId::new(7), reading(30.0)));

        let snap = col.snapshot();
        assert_eq!(snap.len(), 1);
        let latest = snap[0].latest_reading.unwrap();
        assert!((latest.value - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn update_reading_keeps_position() {
        let col = SensorCollection::new();
        col.seed(vec![
            sensor(1, SensorKind::Temperature, None),
            sensor(2, SensorKind::Co2, None),
            sensor(3, SensorKind::Light, None),
        ]);

        col.update_reading(SensorId::new(2), reading(500.0));

        let snap = col.snapshot();
        let ids: Vec<i64> = snap.iter().map(|s| s.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn update_for_unknown_id_inserts_nothing() {
        let col = SensorCollection::new();
        col.seed(vec![sensor(1, SensorKind::Temperature, None)]);

        assert!(!col.update_reading(SensorId::new(99), reading(1.0)));
        assert_eq!(col.len(), 1);
        assert!(col.get(SensorId::new(99)).is_none());
    }

    #[test]
    fn seed_deduplicates_by_id() {
        let col = SensorCollection::new();
        col.seed(vec![
            sensor(1, SensorKind::Temperature, Some(10.0)),
            sensor(1, SensorKind::Temperature, Some(20.0)),
        ]);

        assert_eq!(col.len(), 1);
        let latest = col.get(SensorId::new(1)).unwrap().latest_reading.unwrap();
        assert!((latest.value - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn clear_empties_everything() {
        let col = SensorCollection::new();
        col.seed(vec![sensor(1, SensorKind::Temperature, None)]);
        assert!(!col.is_empty());

        col.clear();
        assert!(col.is_empty());
        assert!(col.snapshot().is_empty());
    }

    #[test]
    fn subscribers_see_mutations() {
        let col = SensorCollection::new();
        let rx = col.subscribe();

        col.seed(vec![sensor(1, SensorKind::Temperature, None)]);
        assert_eq!(rx.borrow().len(), 1);

        col.update_reading(SensorId::new(1), reading(12.0));
        let snap = rx.borrow().clone();
        assert!(snap[0].latest_reading.is_some());
    }
}
