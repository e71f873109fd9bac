use thiserror::Error;

/// Top-level error type for the `flowkit-api` crate.
///
/// `flowkit-core` maps these into capability-level failures; nothing
/// here ever reaches an orchestrator unconverted.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Missing or unusable credential. Raised before any network I/O.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Path segment that cannot name a resource (empty, `.` or `..`).
    #[error("Invalid path segment {segment:?}")]
    InvalidPath { segment: String },

    // ── Upstream ────────────────────────────────────────────────────
    /// Non-success HTTP response. `body` is the raw response text, verbatim.
    #[error("Upstream API error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// Success response whose body was not JSON, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// HTTP status of an upstream failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
