//! Shared configuration for the Verda CLI.
//!
//! TOML profiles, credential resolution (env override > profile value),
//! and translation to `verda_core::MonitorConfig`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use verda_core::{MonitorConfig, ReconnectConfig, TlsVerification, ViewPolicy};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API token configured for profile '{profile}'")]
    NoToken { profile: String },

    #[error("profile '{name}' not found in configuration")]
    ProfileNotFound { name: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default)]
    pub insecure: bool,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "https://farm.example.com").
    pub server: String,

    /// Bearer API token. `VERDA_TOKEN` in the environment wins over
    /// this value, so the file can stay token-free on shared machines.
    #[serde(default)]
    pub token: Option<String>,

    /// Path to a custom CA certificate (PEM).
    #[serde(default)]
    pub ca_cert: Option<PathBuf>,

    /// Accept self-signed TLS certificates.
    #[serde(default)]
    pub insecure: Option<bool>,

    /// Base delay before the first live-channel reconnect, in ms.
    #[serde(default)]
    pub reconnect_initial_ms: Option<u64>,

    /// Upper bound on the live-channel reconnect delay, in ms.
    #[serde(default)]
    pub reconnect_max_ms: Option<u64>,
}

// ── Loading ─────────────────────────────────────────────────────────

/// Path of the config file: `<config-dir>/verda/config.toml`.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "verda")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("verda-config.toml"))
}

/// Load configuration from the default path plus `VERDA_*` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load configuration from an explicit file path plus `VERDA_*` env vars.
///
/// Merge order (later wins): built-in defaults, the TOML file, env.
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let figment = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("VERDA_").split("__"));
    Ok(figment.extract()?)
}

/// The profile name to use: explicit override, else the configured
/// default, else `"default"`.
pub fn active_profile_name(override_name: Option<&str>, config: &Config) -> String {
    override_name
        .map(str::to_owned)
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Resolve the bearer token for a profile: `VERDA_TOKEN` wins, then the
/// profile's stored value.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Ok(token) = std::env::var("VERDA_TOKEN") {
        if !token.is_empty() {
            return Ok(SecretString::from(token));
        }
    }
    profile
        .token
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::NoToken {
            profile: profile_name.to_owned(),
        })
}

/// Build a `MonitorConfig` from a profile and the global defaults.
pub fn resolve_profile(
    config: &Config,
    profile_name: &str,
    policy: ViewPolicy,
) -> Result<MonitorConfig, ConfigError> {
    let profile =
        config
            .profiles
            .get(profile_name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: profile_name.to_owned(),
            })?;

    let base_url: Url = profile
        .server
        .parse()
        .map_err(|e| ConfigError::Validation {
            field: "server".into(),
            reason: format!("invalid URL '{}': {e}", profile.server),
        })?;

    let token = resolve_token(profile, profile_name)?;

    let tls = if let Some(ref ca) = profile.ca_cert {
        TlsVerification::CustomCa(ca.clone())
    } else if profile.insecure.unwrap_or(config.defaults.insecure) {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };

    let mut reconnect = ReconnectConfig::default();
    if let Some(ms) = profile.reconnect_initial_ms {
        reconnect.initial_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = profile.reconnect_max_ms {
        reconnect.max_delay = Duration::from_millis(ms);
    }

    let mut monitor = MonitorConfig::new(base_url, token);
    monitor.policy = policy;
    monitor.tls = tls;
    monitor.timeout = Duration::from_secs(config.defaults.timeout);
    monitor.reconnect = reconnect;
    Ok(monitor)
}

// ── Tests ────────────────────────────────────────────────────────────
