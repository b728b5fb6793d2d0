// ── Core error types ──
//
// User-facing errors from verda-core. These are NOT transport-specific --
// consumers never see HTTP status codes or JSON parse failures directly.
// The `From<verda_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Credential missing, expired, or rejected. The caller should
    /// redirect to re-authentication; retrying locally is pointless.
    #[error("Not authorized: {message}")]
    Unauthorized { message: String },

    /// The greenhouse (or one of its collections) does not exist or is
    /// not owned by the caller.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// The server never produced a response.
    #[error("Cannot reach server: {reason}")]
    Unreachable { reason: String },

    /// The server answered with an error status.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<verda_api::Error> for CoreError {
    fn from(err: verda_api::Error) -> Self {
        match err {
            verda_api::Error::Unauthorized { message } => CoreError::Unauthorized { message },
            verda_api::Error::NotFound { resource } => CoreError::NotFound { resource },
            verda_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() || e.is_request() {
                    CoreError::Unreachable {
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Internal(e.to_string())
                }
            }
            verda_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            verda_api::Error::Tls(msg) => CoreError::Unreachable {
                reason: format!("TLS error: {msg}"),
            },
            verda_api::Error::Server { status, message } => CoreError::Server { status, message },
            verda_api::Error::ChannelConnect(reason) => CoreError::Unreachable {
                reason: format!("live channel: {reason}"),
            },
            verda_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}
