// ── Domain model ──
//
// Canonical, immutable value types produced fresh for every call. Nothing
// here is persisted; cross-references are bare identifiers only. JSON
// field names are camelCase, and optional members are omitted (never
// emitted as `null`) when absent.

pub mod common;
pub mod custom_code;
pub mod form;
pub mod page;
pub mod site;

// ── Re-exports ──────────────────────────────────────────────────────

pub use common::{Pagination, TitleDescription};
pub use custom_code::{CodeTarget, CustomCodeBlock, Script, ScriptLocation};
pub use form::{Form, FormField, FormSubmission};
pub use page::Page;
pub use site::{CustomDomain, Site};
