// ── Page domain type ──

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::common::TitleDescription;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    /// Path relative to the site root once published.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<TitleDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_graph: Option<TitleDescription>,
}
