// ── Core error types ──
//
// User-facing errors from netdiag-core. The Display text of each variant
// is what ends up in notifications, so it stays short and free of
// transport internals. The `From<netdiag_api::Error>` impl keeps the four
// failure kinds distinguishable.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Request outcome ──────────────────────────────────────────────
    #[error("Request timeout")]
    Timeout { timeout_ms: u64 },

    #[error("API Error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("Invalid response from backend: {message}")]
    Decode { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<netdiag_api::Error> for CoreError {
    fn from(err: netdiag_api::Error) -> Self {
        match err {
            netdiag_api::Error::Timeout { timeout_ms } => CoreError::Timeout { timeout_ms },
            netdiag_api::Error::Http {
                status,
                status_text,
            } => CoreError::Http {
                status,
                status_text,
            },
            netdiag_api::Error::Network(e) => CoreError::Network {
                reason: e.to_string(),
            },
            netdiag_api::Error::Decode { message, body: _ } => CoreError::Decode { message },
            netdiag_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            netdiag_api::Error::Tls(message) => CoreError::Config {
                message: format!("TLS error: {message}"),
            },
        }
    }
}
