// ── Site domain type ──

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: String,
    pub display_name: String,
    /// Slug-style name; the designer and settings URLs derive from it.
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    pub designer_url: String,
    pub settings_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_domains: Option<Vec<CustomDomain>>,
}

impl Site {
    pub fn designer_url_for(short_name: &str) -> String {
        format!("https://{short_name}.design.webflow.com")
    }

    pub fn settings_url_for(short_name: &str) -> String {
        format!("https://webflow.com/dashboard/sites/{short_name}/general")
    }
}

/// A registered domain attached to a site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CustomDomain {
    pub id: String,
    pub url: String,
}
