use thiserror::Error;

/// Top-level error type for the `netdiag-api` crate.
///
/// Every request against the diagnostic backend settles into exactly one
/// of four outcomes besides success: the deadline elapsed, the backend
/// answered with a non-success status, the transport failed, or the body
/// did not decode. `netdiag-core` maps these into user-facing messages.
#[derive(Debug, Error)]
pub enum Error {
    // ── Request outcome ─────────────────────────────────────────────
    /// The deadline elapsed before the call settled; the call was dropped.
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The backend responded, but with a non-success status code.
    #[error("API Error: {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not valid JSON or did not match the expected shape.
    #[error("Deserialization error: {message}")]
    Decode { message: String, body: String },

    // ── Construction ────────────────────────────────────────────────
    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// Returns `true` if the request was cancelled by its deadline.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// The HTTP status code, for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
