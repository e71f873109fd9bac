//! Typed, approval-aware agent capabilities over the Webflow Data API.
//!
//! Each capability is a [`Tool`] with a typed input and output; the blanket
//! [`Capability`] impl exposes it as JSON in, JSON out, with generated
//! schemas and an approval flag. Build a [`ToolContext`] from a
//! [`ToolConfig`], then hand it to a [`CapabilityRegistry`]:
//!
//! ```no_run
//! # async fn demo() -> Result<(), flowkit_core::CoreError> {
//! use flowkit_core::{CapabilityRegistry, ToolConfig, ToolContext};
//!
//! let ctx = ToolContext::from_config(&ToolConfig::default())?;
//! let registry = CapabilityRegistry::new(&ctx);
//! let sites = registry.invoke("list_sites", serde_json::json!({})).await?;
//! println!("{sites}");
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod config;
pub mod convert;
pub mod error;
pub mod model;
pub mod normalize;
pub mod registry;
pub mod tools;

// ── Primary re-exports ──────────────────────────────────────────────

pub use capability::{
    Capability, CapabilityDescriptor, MAX_LIST_LIMIT, Outcome, Tool, Validate, decode_input,
};
pub use config::{ToolConfig, ToolContext};
pub use error::CoreError;
pub use flowkit_api::DEFAULT_BASE_URL;
pub use registry::{CapabilityRegistry, Preset};
