// ── Reactive storage ──

mod collection;

pub(crate) use collection::SensorCollection;
