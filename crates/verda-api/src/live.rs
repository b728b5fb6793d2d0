//! Live sensor-update channel with auto-reconnect.
//!
//! Connects to the backend's per-greenhouse push endpoint and streams
//! decoded partial updates through a [`tokio::sync::broadcast`] channel.
//! The connection status is published through a [`tokio::sync::watch`]
//! channel so consumers can show "reconnecting" feedback. Unclean
//! disconnects reconnect with exponential backoff + jitter; a clean
//! server close or a local shutdown ends the channel for good.
//!
//! # Example
//!
//! ```rust,ignore
//! use verda_api::live::{LiveChannelHandle, ReconnectConfig};
//! use tokio_util::sync::CancellationToken;
//! use url::Url;
//!
//! let cancel = CancellationToken::new();
//! let ws_url = Url::parse("wss://farm.example.com/ws/greenhouses/3/data/")?;
//!
//! let handle = LiveChannelHandle::connect(ws_url, ReconnectConfig::default(), cancel.clone());
//! let mut rx = handle.subscribe();
//!
//! while let Ok(update) = rx.recv().await {
//!     println!("sensor {} -> {}", update.sensor_id, update.latest_reading.value);
//! }
//!
//! handle.shutdown();
//! ```

use std::fmt;
use std::time::Duration;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::Error;
use crate::models::ReadingRecord;

// ── Broadcast channel capacity ───────────────────────────────────────

const UPDATE_CHANNEL_CAPACITY: usize = 256;

// ── SensorUpdate ─────────────────────────────────────────────────────

/// A well-formed partial update from the push channel.
///
/// All three fields are mandatory on the wire; a frame missing any of
/// them is malformed and gets dropped before reaching subscribers.
/// Unknown extra fields are tolerated and ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorUpdate {
    /// Identifier of the sensor whose reading changed.
    pub sensor_id: i64,

    /// Sensor type code, e.g. `"TEMP"` -- the reconciler uses it for
    /// view-policy filtering.
    pub sensor_type: String,

    /// Replacement for the sensor's latest reading, wholesale.
    pub latest_reading: ReadingRecord,
}

/// Decode one text frame into a [`SensorUpdate`].
///
/// This is the single validation step between the untyped wire and the
/// reconciler: a frame either decodes fully or is rejected, so the
/// "drop on malformed" policy lives in exactly one place.
pub fn decode_frame(text: &str) -> Result<SensorUpdate, serde_json::Error> {
    serde_json::from_str(text)
}

// ── ChannelState ─────────────────────────────────────────────────────

/// Connection status of the live channel, observable by consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    /// No scope assigned; nothing to connect to.
    Idle,
    /// Handshake in progress.
    Connecting,
    /// Connected and streaming.
    Open,
    /// Connection dropped uncleanly; a reconnect attempt is scheduled.
    Reconnecting { attempt: u32 },
    /// Closed for good: clean server close, local shutdown, or retry
    /// budget exhausted. No further reconnect attempts.
    Closed,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Connecting => write!(f, "connecting"),
            Self::Open => write!(f, "open"),
            Self::Reconnecting { attempt } => write!(f, "reconnecting (attempt {attempt})"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

// ── ReconnectConfig ──────────────────────────────────────────────────

/// Exponential backoff configuration for channel reconnection.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Delay before the first reconnection attempt. Default: 1s.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 30s.
    pub max_delay: Duration,

    /// Maximum reconnection attempts before giving up.
    /// `None` means retry forever.
    pub max_retries: Option<u32>,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: None,
        }
    }
}

// ── LiveChannelHandle ────────────────────────────────────────────────

/// Handle to a running live channel.
///
/// Spawning the background task is the only side effect of
/// [`connect`](Self::connect); the first connection attempt happens
/// asynchronously. Drop all receivers and call
/// [`shutdown`](Self::shutdown) to tear the task down.
pub struct LiveChannelHandle {
    update_rx: broadcast::Receiver<SensorUpdate>,
    state_rx: watch::Receiver<ChannelState>,
    cancel: CancellationToken,
}

impl LiveChannelHandle {
    /// Spawn the channel task for `ws_url` and return its handle.
    pub fn connect(ws_url: Url, reconnect: ReconnectConfig, cancel: CancellationToken) -> Self {
        let (update_tx, update_rx) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        let (state_tx, state_rx) = watch::channel(ChannelState::Idle);

        let task_cancel = cancel.clone();
        tokio::spawn(async move {
            channel_loop(ws_url, update_tx, state_tx, reconnect, task_cancel).await;
        });

        Self {
            update_rx,
            state_rx,
            cancel,
        }
    }

    /// Get a new broadcast receiver for decoded updates.
    ///
    /// Multiple consumers can subscribe concurrently. A consumer that
    /// falls behind receives [`broadcast::error::RecvError::Lagged`].
    pub fn subscribe(&self) -> broadcast::Receiver<SensorUpdate> {
        self.update_rx.resubscribe()
    }

    /// Observe connection state changes.
    pub fn state(&self) -> watch::Receiver<ChannelState> {
        self.state_rx.clone()
    }

    /// Signal the background task to shut down. The state settles on
    /// [`ChannelState::Closed`] once the task exits.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

// ── Background reconnection loop ─────────────────────────────────────

/// Why a single connection ended.
enum Disconnect {
    /// Local cancellation -- stop, no reconnect.
    Requested,
    /// Server sent a normal close frame -- stop, no reconnect.
    Clean,
    /// Close frame with a non-normal code, or the stream ended without
    /// a close handshake -- reconnect.
    Unclean,
}

/// Main loop: connect → read → on unclean disconnect, backoff → reconnect.
async fn channel_loop(
    ws_url: Url,
    update_tx: broadcast::Sender<SensorUpdate>,
    state_tx: watch::Sender<ChannelState>,
    reconnect: ReconnectConfig,
    cancel: CancellationToken,
) {
    let mut attempt: u32 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = connect_and_read(&ws_url, &update_tx, &state_tx, &cancel) => {
                match result {
                    Ok(Disconnect::Requested) => break,
                    Ok(Disconnect::Clean) => {
                        tracing::info!("live channel closed cleanly, not reconnecting");
                        break;
                    }
                    Ok(Disconnect::Unclean) => {
                        // A connection had been established; start the
                        // backoff ladder from the bottom again.
                        attempt = 0;
                        tracing::warn!("live channel dropped uncleanly, reconnecting");
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, attempt, "live channel error");
                    }
                }

                if let Some(max) = reconnect.max_retries {
                    if attempt >= max {
                        tracing::error!(
                            max_retries = max,
                            "live channel reconnection limit reached, giving up"
                        );
                        break;
                    }
                }

                let delay = calculate_backoff(attempt, &reconnect);
                state_tx.send_replace(ChannelState::Reconnecting { attempt: attempt + 1 });
                tracing::info!(
                    delay_ms = delay.as_millis() as u64,
                    attempt,
                    "waiting before reconnect"
                );

                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                }

                attempt += 1;
            }
        }
    }

    state_tx.send_replace(ChannelState::Closed);
}

// ── Single connection lifecycle ──────────────────────────────────────

/// Establish one connection and read frames until it ends.
async fn connect_and_read(
    url: &Url,
    update_tx: &broadcast::Sender<SensorUpdate>,
    state_tx: &watch::Sender<ChannelState>,
    cancel: &CancellationToken,
) -> Result<Disconnect, Error> {
    state_tx.send_replace(ChannelState::Connecting);
    tracing::info!(url = %url, "connecting live channel");

    let (ws_stream, _response) = tokio_tungstenite::connect_async(url.as_str())
        .await
        .map_err(|e| Error::ChannelConnect(e.to_string()))?;

    state_tx.send_replace(ChannelState::Open);
    tracing::info!("live channel open");

    let (_write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(Disconnect::Requested),
            frame = read.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        match decode_frame(&text) {
                            Ok(update) => {
                                // Ignore send errors -- no subscribers right now
                                let _ = update_tx.send(update);
                            }
                            Err(e) => {
                                tracing::debug!(error = %e, "dropping malformed live frame");
                            }
                        }
                    }
                    Some(Ok(tungstenite::Message::Ping(_))) => {
                        // tungstenite handles pong replies automatically
                        tracing::trace!("live channel ping");
                    }
                    Some(Ok(tungstenite::Message::Close(frame))) => {
                        let clean = frame
                            .as_ref()
                            .is_none_or(|cf| cf.code == CloseCode::Normal);
                        if let Some(ref cf) = frame {
                            tracing::info!(
                                code = %cf.code,
                                reason = %cf.reason,
                                clean,
                                "live channel close frame received"
                            );
                        } else {
                            tracing::info!("live channel close frame received (no payload)");
                        }
                        return Ok(if clean { Disconnect::Clean } else { Disconnect::Unclean });
                    }
                    Some(Err(e)) => {
                        return Err(Error::ChannelConnect(e.to_string()));
                    }
                    None => {
                        // Stream ended without a close handshake
                        tracing::info!("live channel stream ended");
                        return Ok(Disconnect::Unclean);
                    }
                    _ => {
                        // Binary, Pong, Frame -- ignore
                    }
                }
            }
        }
    }
}

// ── Backoff calculation ──────────────────────────────────────────────

/// Exponential backoff with jitter.
///
/// `delay = min(initial * 2^attempt, max) + jitter`
///
/// Jitter is +-25%, deterministic per attempt, to spread reconnection
/// storms from many dashboards pointing at the same server.
fn calculate_backoff(attempt: u32, config: &ReconnectConfig) -> Duration {
    let base = config.initial_delay.as_secs_f64() * 2.0_f64.powi(attempt as i32);
    let capped = base.min(config.max_delay.as_secs_f64());

    let jitter_factor = 1.0 + 0.25 * ((attempt as f64 * 7.3).sin());
    let with_jitter = (capped * jitter_factor).max(0.0);

    Duration::from_secs_f64(with_jitter)
}

// ── Tests ────────────────────────────────────────────────────────────
