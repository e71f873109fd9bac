// Site capabilities: listing and publishing.

use std::sync::Arc;

use async_trait::async_trait;
use flowkit_api::ApiPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;

use crate::capability::{Outcome, Tool, Validate, check_non_empty};
use crate::config::ToolContext;
use crate::convert::custom_domains;
use crate::error::{CoreError, failure_message};
use crate::model::{CustomDomain, Site};
use crate::normalize::list;

// ── list_sites ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListSitesInput {}

impl Validate for ListSitesInput {}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListSitesOutput {
    pub sites: Vec<Site>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome for ListSitesOutput {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Lists every site the token can see.
pub struct ListSites {
    ctx: Arc<ToolContext>,
}

impl ListSites {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    async fn fetch(&self) -> Result<Vec<Site>, CoreError> {
        let body = self.ctx.client().get("sites").await?;
        Ok(list(&body, "sites").iter().map(Site::from).collect())
    }
}

#[async_trait]
impl Tool for ListSites {
    type Input = ListSitesInput;
    type Output = ListSitesOutput;

    const NAME: &'static str = "list_sites";
    const DESCRIPTION: &'static str = "List all Webflow sites accessible with the configured \
        token, including display name, short name, last published time, and designer and \
        settings URLs.";
    const REQUIRES_APPROVAL: bool = false;

    fn examples(&self) -> Vec<Value> {
        vec![json!({})]
    }

    async fn execute(&self, _input: ListSitesInput) -> ListSitesOutput {
        match self.fetch().await {
            Ok(sites) => ListSitesOutput {
                count: sites.len(),
                sites,
                error: None,
            },
            Err(e) => ListSitesOutput {
                sites: Vec::new(),
                count: 0,
                error: Some(failure_message("Failed to list sites", &e)),
            },
        }
    }
}

// ── publish_site ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PublishSiteInput {
    /// Site to publish; falls back to the configured default site.
    #[serde(default)]
    pub site_id: Option<String>,
    /// Publish to the platform-provided subdomain. Defaults to `false`.
    #[serde(default)]
    pub publish_to_webflow_subdomain: Option<bool>,
    /// Custom domain ids to publish to.
    #[serde(default)]
    pub custom_domains: Option<Vec<String>>,
}

impl Validate for PublishSiteInput {
    fn validate(&self) -> Result<(), CoreError> {
        for domain in self.custom_domains.iter().flatten() {
            check_non_empty("customDomains[]", domain)?;
        }
        Ok(())
    }
}

/// Wire body for `POST /sites/{siteId}/publish`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishRequest {
    publish_to_webflow_subdomain: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_domains: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishSiteOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_domains: Option<Vec<CustomDomain>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome for PublishSiteOutput {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Publishes a site to its subdomain and/or custom domains.
pub struct PublishSite {
    ctx: Arc<ToolContext>,
}

impl PublishSite {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    async fn publish(&self, input: PublishSiteInput) -> Result<Option<Vec<CustomDomain>>, CoreError> {
        let site_id = self.ctx.resolve_site_id(input.site_id.as_deref())?;

        let request = PublishRequest {
            publish_to_webflow_subdomain: input.publish_to_webflow_subdomain.unwrap_or(false),
            custom_domains: input.custom_domains.filter(|d| !d.is_empty()),
        };
        if !request.publish_to_webflow_subdomain && request.custom_domains.is_none() {
            warn!(site_id = %site_id, "publishing with neither subdomain nor custom domains selected");
        }

        let body = serde_json::to_value(&request).map_err(|e| CoreError::Internal(e.to_string()))?;
        let resp = self
            .ctx
            .client()
            .post(ApiPath::new("sites").id(&site_id).then("publish"), body)
            .await?;
        Ok(custom_domains(&resp))
    }
}

#[async_trait]
impl Tool for PublishSite {
    type Input = PublishSiteInput;
    type Output = PublishSiteOutput;

    const NAME: &'static str = "publish_site";
    const DESCRIPTION: &'static str = "Publish a Webflow site, making its current content live \
        on the Webflow subdomain and/or the given custom domains. Requires approval.";
    const REQUIRES_APPROVAL: bool = true;

    fn examples(&self) -> Vec<Value> {
        vec![
            json!({ "publishToWebflowSubdomain": true }),
            json!({ "siteId": "580e63e98c9a982ac9b8b741", "customDomains": ["660c6449dd97ebc7346ac629"] }),
        ]
    }

    async fn execute(&self, input: PublishSiteInput) -> PublishSiteOutput {
        match self.publish(input).await {
            Ok(custom_domains) => PublishSiteOutput {
                success: true,
                custom_domains,
                error: None,
            },
            Err(e) => PublishSiteOutput {
                success: false,
                custom_domains: None,
                error: Some(failure_message("Failed to publish site", &e)),
            },
        }
    }
}
