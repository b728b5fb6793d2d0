// ── Reactive sensor streams ──
//
// Subscription types for consuming collection changes from a monitor.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Sensor;

/// A subscription to the monitored sensor collection.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via [`changed`](Self::changed) or by converting to a
/// `Stream`.
pub struct SensorStream {
    current: Arc<Vec<Arc<Sensor>>>,
    receiver: watch::Receiver<Arc<Vec<Arc<Sensor>>>>,
}

impl SensorStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<Arc<Sensor>>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Get the snapshot captured at creation time.
    pub fn current(&self) -> &Arc<Vec<Arc<Sensor>>> {
        &self.current
    }

    /// Get the latest snapshot (may have changed since creation).
    pub fn latest(&self) -> Arc<Vec<Arc<Sensor>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the owning monitor has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<Sensor>>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> SensorWatchStream {
        SensorWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new snapshot each time the underlying collection mutates.
pub struct SensorWatchStream {
    inner: WatchStream<Arc<Vec<Arc<Sensor>>>>,
}

impl Stream for SensorWatchStream {
    type Item = Arc<Vec<Arc<Sensor>>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin for Unpin payloads, which Arc always is.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
