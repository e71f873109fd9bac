// Page capabilities: listing and partial metadata updates.

use std::sync::Arc;

use async_trait::async_trait;
use flowkit_api::{ApiPath, CallOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::capability::{Outcome, Tool, Validate, check_limit, check_non_empty};
use crate::config::ToolContext;
use crate::error::{CoreError, failure_message};
use crate::model::{Page, Pagination, TitleDescription};
use crate::normalize::{list, pagination};

// ── list_pages ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListPagesInput {
    /// Site whose pages to list; falls back to the configured default site.
    #[serde(default)]
    pub site_id: Option<String>,
    /// Page size, 1 to 100.
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl Validate for ListPagesInput {
    fn validate(&self) -> Result<(), CoreError> {
        check_limit(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListPagesOutput {
    pub pages: Vec<Page>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome for ListPagesOutput {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Lists the static pages of a site.
pub struct ListPages {
    ctx: Arc<ToolContext>,
}

impl ListPages {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    async fn fetch(&self, input: &ListPagesInput) -> Result<(Vec<Page>, Option<Pagination>), CoreError> {
        let site_id = self.ctx.resolve_site_id(input.site_id.as_deref())?;
        let options = CallOptions::get()
            .param("limit", input.limit)
            .param("offset", input.offset);
        let body = self
            .ctx
            .client()
            .call(ApiPath::new("sites").id(&site_id).then("pages"), options)
            .await?;

        let pages = list(&body, "pages").iter().map(Page::from).collect();
        Ok((pages, pagination(body.get("pagination"))))
    }
}

#[async_trait]
impl Tool for ListPages {
    type Input = ListPagesInput;
    type Output = ListPagesOutput;

    const NAME: &'static str = "list_pages";
    const DESCRIPTION: &'static str = "List the pages of a Webflow site with their titles, slugs, \
        draft/archived state, and SEO and Open Graph metadata.";
    const REQUIRES_APPROVAL: bool = false;

    fn examples(&self) -> Vec<Value> {
        vec![
            json!({}),
            json!({ "siteId": "580e63e98c9a982ac9b8b741", "limit": 20, "offset": 40 }),
        ]
    }

    async fn execute(&self, input: ListPagesInput) -> ListPagesOutput {
        match self.fetch(&input).await {
            Ok((pages, pagination)) => ListPagesOutput {
                count: pages.len(),
                pages,
                pagination,
                error: None,
            },
            Err(e) => ListPagesOutput {
                pages: Vec::new(),
                count: 0,
                pagination: None,
                error: Some(failure_message("Failed to list pages", &e)),
            },
        }
    }
}

// ── update_page ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePageInput {
    pub page_id: String,
    /// Secondary locale to update; the primary locale when omitted.
    #[serde(default)]
    pub locale_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub seo: Option<TitleDescription>,
    #[serde(default)]
    pub open_graph: Option<TitleDescription>,
}

impl Validate for UpdatePageInput {
    fn validate(&self) -> Result<(), CoreError> {
        check_non_empty("pageId", &self.page_id)
    }
}

/// Wire body for `PUT /pages/{pageId}`. Omitted members are never sent.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seo: Option<TitleDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    open_graph: Option<TitleDescription>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct UpdatePageOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome for UpdatePageOutput {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Updates a page's title, slug, or metadata. Only supplied fields change.
pub struct UpdatePage {
    ctx: Arc<ToolContext>,
}

impl UpdatePage {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    async fn update(&self, input: UpdatePageInput) -> Result<Page, CoreError> {
        let request = UpdatePageRequest {
            title: input.title,
            slug: input.slug,
            seo: input.seo,
            open_graph: input.open_graph,
        };
        let body = serde_json::to_value(&request).map_err(|e| CoreError::Internal(e.to_string()))?;
        let options = CallOptions::put(body).param("localeId", input.locale_id);

        let resp = self
            .ctx
            .client()
            .call(ApiPath::new("pages").id(&input.page_id), options)
            .await?;
        Ok(Page::from(&resp))
    }
}

#[async_trait]
impl Tool for UpdatePage {
    type Input = UpdatePageInput;
    type Output = UpdatePageOutput;

    const NAME: &'static str = "update_page";
    const DESCRIPTION: &'static str = "Update a Webflow page's title, slug, SEO metadata, or Open \
        Graph metadata. Only the fields provided are changed. Requires approval.";
    const REQUIRES_APPROVAL: bool = true;

    fn examples(&self) -> Vec<Value> {
        vec![
            json!({ "pageId": "63c720f9347c2139b248e552", "title": "About us" }),
            json!({
                "pageId": "63c720f9347c2139b248e552",
                "seo": { "title": "About | Acme", "description": "Who we are" },
                "openGraph": { "title": "About Acme" }
            }),
        ]
    }

    async fn execute(&self, input: UpdatePageInput) -> UpdatePageOutput {
        match self.update(input).await {
            Ok(page) => UpdatePageOutput {
                success: true,
                page: Some(page),
                error: None,
            },
            Err(e) => UpdatePageOutput {
                success: false,
                page: None,
                error: Some(failure_message("Failed to update page", &e)),
            },
        }
    }
}
