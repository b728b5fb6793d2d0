//! Resolution of CLI flags + config file into a `MonitorConfig`.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use verda_core::{MonitorConfig, TlsVerification, ViewPolicy};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Build a `MonitorConfig` from the config file, the active profile,
/// and CLI flag overrides.
///
/// `--server` bypasses profiles entirely (flags/env only); otherwise
/// the active profile is resolved and flags override its values.
pub fn monitor_config(
    global: &GlobalOpts,
    policy: ViewPolicy,
    live_enabled: bool,
) -> Result<MonitorConfig, CliError> {
    let config = verda_config::load_config()?;
    let profile_name = verda_config::active_profile_name(global.profile.as_deref(), &config);

    let mut monitor = if let Some(ref server) = global.server {
        from_flags(server, global, &profile_name, policy)?
    } else if config.profiles.contains_key(&profile_name) {
        let mut monitor = verda_config::resolve_profile(&config, &profile_name, policy)?;
        if let Some(ref token) = global.token {
            monitor.token = SecretString::from(token.clone());
        }
        if global.insecure {
            monitor.tls = TlsVerification::DangerAcceptInvalid;
        }
        monitor
    } else {
        return Err(CliError::NoConfig {
            path: verda_config::config_path().display().to_string(),
        });
    };

    monitor.timeout = Duration::from_secs(global.timeout);
    monitor.live_enabled = live_enabled;
    Ok(monitor)
}

/// Build a config from `--server`/`--token` alone, no profile involved.
fn from_flags(
    server: &str,
    global: &GlobalOpts,
    profile_name: &str,
    policy: ViewPolicy,
) -> Result<MonitorConfig, CliError> {
    let base_url: Url = server.parse().map_err(|_| CliError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {server}"),
    })?;

    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| CliError::NoToken {
            profile: profile_name.to_owned(),
        })?;

    let mut monitor = MonitorConfig::new(base_url, token);
    monitor.policy = policy;
    if global.insecure {
        monitor.tls = TlsVerification::DangerAcceptInvalid;
    }
    Ok(monitor)
}
