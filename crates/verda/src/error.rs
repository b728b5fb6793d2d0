//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use verda_config::ConfigError;
use verda_core::CoreError;

/// Exit codes, stable for scripting.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the server")]
    #[diagnostic(
        code(verda::connection_failed),
        help(
            "Check that the server is running and accessible.\n\
             Reason: {reason}\n\
             For self-signed certificates, try --insecure (-k)."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Not authorized")]
    #[diagnostic(
        code(verda::auth_failed),
        help(
            "Your API token is missing, expired, or rejected.\n\
             Sign in again and update the token in your profile,\n\
             or set the VERDA_TOKEN environment variable."
        )
    )]
    AuthFailed,

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(verda::no_token),
        help(
            "Add a token to the profile in your config file,\n\
             or set the VERDA_TOKEN environment variable."
        )
    )]
    NoToken { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Not found: {resource}")]
    #[diagnostic(
        code(verda::not_found),
        help("The greenhouse may not exist or may not be owned by you.\nRun: verda greenhouses")
    )]
    NotFound { resource: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Server error: {message}")]
    #[diagnostic(code(verda::api_error))]
    ApiError { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(verda::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(verda::profile_not_found),
        help("Define [profiles.{name}] in your config file, or pass --server and --token.")
    )]
    ProfileNotFound { name: String },

    #[error("No server configured")]
    #[diagnostic(
        code(verda::no_config),
        help(
            "Pass --server and --token, or create a config file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(verda::config))]
    Config { message: String },

    // ── Timeout ──────────────────────────────────────────────────────

    #[error("Request timed out")]
    #[diagnostic(
        code(verda::timeout),
        help("Increase the timeout with --timeout or check server responsiveness.")
    )]
    Timeout,

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(verda::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NoToken { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Unauthorized { .. } => CliError::AuthFailed,

            CoreError::NotFound { resource } => CliError::NotFound { resource },

            CoreError::Unreachable { reason } => CliError::ConnectionFailed { reason },

            CoreError::Server { status, message } => CliError::ApiError {
                message: format!("HTTP {status}: {message}"),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoToken { profile } => CliError::NoToken { profile },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound { name },
            ConfigError::Figment(e) => CliError::Config {
                message: e.to_string(),
            },
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
