// ── Monitor configuration ──

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use verda_api::live::ReconnectConfig;

use crate::policy::ViewPolicy;

/// TLS verification mode (core-level mirror of the api crate's TlsMode).
#[derive(Debug, Clone)]
pub enum TlsVerification {
    SystemDefaults,
    CustomCa(PathBuf),
    DangerAcceptInvalid,
}

/// Configuration for a [`LiveMonitor`](crate::LiveMonitor).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Server root URL, e.g. `https://farm.example.com`.
    pub base_url: Url,

    /// Bearer credential attached to every request.
    pub token: SecretString,

    /// Sensor-type filter for this monitor's page.
    pub policy: ViewPolicy,

    pub tls: TlsVerification,
    pub timeout: Duration,
    pub reconnect: ReconnectConfig,

    /// When `false`, [`start`](crate::LiveMonitor::start) only fetches
    /// the snapshot and never opens the push channel. Used for one-shot
    /// CLI invocations.
    pub live_enabled: bool,
}

impl MonitorConfig {
    /// Config with defaults: no filtering, system TLS, 30s timeout,
    /// live channel enabled.
    pub fn new(base_url: Url, token: SecretString) -> Self {
        Self {
            base_url,
            token,
            policy: ViewPolicy::all(),
            tls: TlsVerification::SystemDefaults,
            timeout: Duration::from_secs(30),
            reconnect: ReconnectConfig::default(),
            live_enabled: true,
        }
    }
}
