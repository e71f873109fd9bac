// ── Shared building blocks ──

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Pagination envelope attached to list results when upstream supplied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct Pagination {
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
}

/// Title + description pair shared by SEO and Open Graph metadata.
///
/// `Option<TitleDescription>` carries three states: `None` (no metadata
/// object at all), `Some` with both members `None` (an empty object), and
/// `Some` with values. They serialize as an absent key, `{}`, and a
/// populated object respectively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TitleDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TitleDescription {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }
}
