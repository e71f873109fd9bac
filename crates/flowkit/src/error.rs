//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code per class.

use miette::Diagnostic;
use thiserror::Error;

use flowkit_config::ConfigError;
use flowkit_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    /// The capability ran and reported a failure result.
    pub const FAILED: i32 = 4;
    pub const CANCELLED: i32 = 5;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Capabilities ─────────────────────────────────────────────────

    #[error("Unknown capability '{name}'")]
    #[diagnostic(
        code(flowkit::unknown_capability),
        help("Available capabilities: {available}\nRun: flowkit tools")
    )]
    UnknownCapability { name: String, available: String },

    #[error("Invalid arguments for '{name}': {reason}")]
    #[diagnostic(
        code(flowkit::invalid_arguments),
        help("Run: flowkit describe {name} to see the input schema and examples")
    )]
    InvalidArguments { name: String, reason: String },

    #[error("'{name}' failed: {message}")]
    #[diagnostic(code(flowkit::capability_failed))]
    CapabilityFailed { name: String, message: String },

    // ── Approval ─────────────────────────────────────────────────────

    #[error("'{name}' requires approval")]
    #[diagnostic(
        code(flowkit::confirmation_required),
        help("Use --yes (-y) to approve in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { name: String },

    #[error("'{name}' was not approved")]
    #[diagnostic(code(flowkit::cancelled))]
    Declined { name: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(flowkit::profile_not_found),
        help("Available profiles: {available}\nConfig file: {path}")
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(flowkit::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(flowkit::config), help("Run: flowkit config path to locate the config file"))]
    Config(ConfigError),

    // ── Internal / IO ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(code(flowkit::internal))]
    Core(CoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(flowkit::json), help("Arguments must be a single JSON object."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownCapability { .. }
            | Self::InvalidArguments { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Validation { .. }
            | Self::Json(_) => exit_code::USAGE,
            Self::ProfileNotFound { .. } | Self::Config(_) => exit_code::CONFIG,
            Self::CapabilityFailed { .. } => exit_code::FAILED,
            Self::Declined { .. } => exit_code::CANCELLED,
            Self::Core(_) | Self::Io(_) => exit_code::GENERAL,
        }
    }

    /// Attach the capability name to a core error from `invoke`.
    pub fn from_invoke(name: &str, err: CoreError) -> Self {
        match err {
            CoreError::Validation { message } => Self::InvalidArguments {
                name: name.to_owned(),
                reason: message,
            },
            other => Self::Core(other),
        }
    }
}

// ── Library error mapping ────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::UnknownProfile { name, available } => Self::ProfileNotFound {
                name,
                available,
                path: flowkit_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration { message } => Self::Validation {
                field: "configuration".into(),
                reason: message,
            },
            other => Self::Core(other),
        }
    }
}
