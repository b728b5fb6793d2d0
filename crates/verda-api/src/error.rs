use thiserror::Error;

/// Top-level error type for the `verda-api` crate.
///
/// Covers every failure mode across the REST surface and the live channel.
/// `verda-core` maps these into user-facing diagnostics; nothing here leaks
/// into the CLI unmapped.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Bearer credential missing, expired, or rejected (HTTP 401/403).
    /// The caller is expected to redirect to re-authentication.
    #[error("Not authorized: {message}")]
    Unauthorized { message: String },

    // ── Resources ───────────────────────────────────────────────────
    /// Requested resource does not exist or is not owned by the caller.
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout --
    /// the request never produced a usable response).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Server ──────────────────────────────────────────────────────
    /// Non-2xx response other than 401/403/404.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    // ── Live channel ────────────────────────────────────────────────
    /// Live channel connection or transport failure. Recovered locally by
    /// the reconnect loop; only surfaced when the loop gives up.
    #[error("Live channel failed: {0}")]
    ChannelConnect(String),

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this error means the credential was rejected and
    /// re-authentication might resolve it.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the server never produced a response.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::ChannelConnect(_) => true,
            _ => false,
        }
    }
}
