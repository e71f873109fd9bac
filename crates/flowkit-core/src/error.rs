// ── Core error types ──
//
// Capability-level errors. Executors convert every variant except
// `Validation` into their own failure shape; `Validation` is returned by
// the contract layer before an executor runs. The `From<flowkit_api::Error>`
// impl translates transport-layer errors into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Raised before any I/O ────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Invalid arguments: {message}")]
    Validation { message: String },

    #[error("Precondition failed: {message}")]
    Precondition { message: String },

    // ── Upstream ─────────────────────────────────────────────────────
    /// Non-success response. `body` is the upstream text, verbatim.
    #[error("Upstream API error (HTTP {status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Request failed: {message}")]
    Transport { message: String },

    /// Success response that did not carry what the operation needed.
    #[error("Unexpected response: {message}")]
    Protocol { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }

    /// HTTP status of an upstream failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<flowkit_api::Error> for CoreError {
    fn from(err: flowkit_api::Error) -> Self {
        match err {
            flowkit_api::Error::Configuration { message } => CoreError::Configuration { message },
            flowkit_api::Error::InvalidUrl(e) => CoreError::Configuration {
                message: format!("Invalid URL: {e}"),
            },
            flowkit_api::Error::InvalidPath { segment } => CoreError::Precondition {
                message: format!("{segment:?} is not a usable identifier"),
            },
            flowkit_api::Error::Upstream { status, body } => CoreError::Upstream { status, body },
            flowkit_api::Error::Transport(e) => CoreError::Transport {
                message: e.to_string(),
            },
            flowkit_api::Error::Deserialization { message, body: _ } => {
                CoreError::Protocol { message }
            }
        }
    }
}

/// User-facing failure text: `"<prefix>: <cause>"`, or just the
/// capability's fixed prefix when the cause renders empty.
pub(crate) fn failure_message(prefix: &str, err: &CoreError) -> String {
    let cause = err.to_string();
    if cause.trim().is_empty() {
        prefix.to_owned()
    } else {
        format!("{prefix}: {cause}")
    }
}
