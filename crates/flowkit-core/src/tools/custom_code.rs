// Custom code capabilities: inspecting applied blocks, and the two-step
// register-then-apply workflow for inline scripts.

use std::sync::Arc;

use async_trait::async_trait;
use flowkit_api::{ApiPath, CallOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::capability::{Outcome, Tool, Validate, check_limit, check_non_empty};
use crate::config::ToolContext;
use crate::error::{CoreError, failure_message};
use crate::model::{CodeTarget, CustomCodeBlock, Pagination, Script, ScriptLocation};
use crate::normalize::{list, pagination, string_field};

/// Upper bound on inline script source, in characters.
pub const MAX_INLINE_SOURCE_CHARS: usize = 2000;

const DEFAULT_SCRIPT_VERSION: &str = "1.0.0";

// ── list_custom_code ────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListCustomCodeInput {
    #[serde(default)]
    pub site_id: Option<String>,
    /// Page size, 1 to 100.
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl Validate for ListCustomCodeInput {
    fn validate(&self) -> Result<(), CoreError> {
        check_limit(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListCustomCodeOutput {
    pub blocks: Vec<CustomCodeBlock>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome for ListCustomCodeOutput {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Lists the custom code blocks applied across a site and its pages.
pub struct ListCustomCode {
    ctx: Arc<ToolContext>,
}

impl ListCustomCode {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    async fn fetch(
        &self,
        input: &ListCustomCodeInput,
    ) -> Result<(Vec<CustomCodeBlock>, Option<Pagination>), CoreError> {
        let site_id = self.ctx.resolve_site_id(input.site_id.as_deref())?;
        let options = CallOptions::get()
            .param("limit", input.limit)
            .param("offset", input.offset);
        let body = self
            .ctx
            .client()
            .call(ApiPath::new("sites").id(&site_id).then("custom_code/blocks"), options)
            .await?;

        let blocks = list(&body, "blocks")
            .iter()
            .map(CustomCodeBlock::from)
            .collect();
        Ok((blocks, pagination(body.get("pagination"))))
    }
}

#[async_trait]
impl Tool for ListCustomCode {
    type Input = ListCustomCodeInput;
    type Output = ListCustomCodeOutput;

    const NAME: &'static str = "list_custom_code";
    const DESCRIPTION: &'static str = "List the custom code blocks applied to a Webflow site and \
        its pages, with the registered scripts each block runs.";
    const REQUIRES_APPROVAL: bool = false;

    fn examples(&self) -> Vec<Value> {
        vec![json!({}), json!({ "siteId": "580e63e98c9a982ac9b8b741" })]
    }

    async fn execute(&self, input: ListCustomCodeInput) -> ListCustomCodeOutput {
        match self.fetch(&input).await {
            Ok((blocks, pagination)) => ListCustomCodeOutput {
                count: blocks.len(),
                blocks,
                pagination,
                error: None,
            },
            Err(e) => ListCustomCodeOutput {
                blocks: Vec::new(),
                count: 0,
                pagination: None,
                error: Some(failure_message("Failed to list custom code", &e)),
            },
        }
    }
}

// ── add_custom_code ─────────────────────────────────────────────────

fn default_version() -> String {
    DEFAULT_SCRIPT_VERSION.to_owned()
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddCustomCodeInput {
    #[serde(default)]
    pub site_id: Option<String>,
    /// Apply to the whole site, or to a single page.
    #[serde(default)]
    pub target: CodeTarget,
    /// Required when `target` is `page`.
    #[serde(default)]
    pub page_id: Option<String>,
    /// Inline JavaScript, without `<script>` tags. At most 2000 characters.
    pub source_code: String,
    pub display_name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub location: ScriptLocation,
}

impl Validate for AddCustomCodeInput {
    fn validate(&self) -> Result<(), CoreError> {
        check_non_empty("displayName", &self.display_name)?;
        check_non_empty("version", &self.version)
    }
}

impl AddCustomCodeInput {
    /// Checks that must pass before anything is sent upstream, in order.
    fn preconditions(&self) -> Result<(), CoreError> {
        if self.target == CodeTarget::Page && self.page_id().is_none() {
            return Err(CoreError::precondition(
                "pageId is required when target is \"page\"",
            ));
        }

        let length = self.source_code.chars().count();
        if length > MAX_INLINE_SOURCE_CHARS {
            return Err(CoreError::precondition(format!(
                "sourceCode is {length} characters, which exceeds the \
                 {MAX_INLINE_SOURCE_CHARS} character limit"
            )));
        }
        Ok(())
    }

    fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Wire body for `POST /sites/{siteId}/registered_scripts/inline`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterScriptRequest<'a> {
    source_code: &'a str,
    version: &'a str,
    display_name: &'a str,
}

/// Wire body for `PUT .../custom_code`.
#[derive(Debug, Serialize)]
struct ApplyScriptsRequest {
    scripts: Vec<Script>,
}

#[derive(Debug, Clone, Default, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomCodeOutput {
    pub success: bool,
    /// Set once registration succeeded, even when applying it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_id: Option<String>,
    /// `site:<id>` or `page:<id>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AddCustomCodeOutput {
    fn failed(script_id: Option<String>, prefix: &str, err: &CoreError) -> Self {
        Self {
            success: false,
            script_id,
            applied_to: None,
            error: Some(failure_message(prefix, err)),
        }
    }
}

impl Outcome for AddCustomCodeOutput {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Registers an inline script, then applies it to a site or page.
///
/// The two calls run strictly in sequence. If applying fails the
/// registered script is left in place and its id is still reported.
pub struct AddCustomCode {
    ctx: Arc<ToolContext>,
}

impl AddCustomCode {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    async fn register(&self, site_id: &str, input: &AddCustomCodeInput) -> Result<String, CoreError> {
        let request = RegisterScriptRequest {
            source_code: &input.source_code,
            version: &input.version,
            display_name: &input.display_name,
        };
        let body = serde_json::to_value(&request).map_err(|e| CoreError::Internal(e.to_string()))?;
        let resp = self
            .ctx
            .client()
            .post(
                ApiPath::new("sites").id(site_id).then("registered_scripts/inline"),
                body,
            )
            .await?;

        string_field(&resp, "id")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CoreError::Protocol {
                message: "no script identifier returned".into(),
            })
    }

    async fn apply(
        &self,
        site_id: &str,
        script_id: &str,
        input: &AddCustomCodeInput,
    ) -> Result<String, CoreError> {
        let (path, applied_to) = match (input.target, input.page_id()) {
            (CodeTarget::Page, Some(page_id)) => (
                ApiPath::new("pages").id(page_id).then("custom_code"),
                format!("page:{page_id}"),
            ),
            _ => (
                ApiPath::new("sites").id(site_id).then("custom_code"),
                format!("site:{site_id}"),
            ),
        };

        let request = ApplyScriptsRequest {
            scripts: vec![Script {
                id: script_id.to_owned(),
                location: input.location,
                version: input.version.clone(),
            }],
        };
        let body = serde_json::to_value(&request).map_err(|e| CoreError::Internal(e.to_string()))?;
        self.ctx.client().put(path, body).await?;
        Ok(applied_to)
    }
}

#[async_trait]
impl Tool for AddCustomCode {
    type Input = AddCustomCodeInput;
    type Output = AddCustomCodeOutput;

    const NAME: &'static str = "add_custom_code";
    const DESCRIPTION: &'static str = "Register an inline script (at most 2000 characters, no \
        <script> tags) and apply it to a Webflow site or a single page, in the header or footer. \
        Requires approval.";
    const REQUIRES_APPROVAL: bool = true;

    fn examples(&self) -> Vec<Value> {
        vec![
            json!({
                "sourceCode": "console.log('hello');",
                "displayName": "Hello logger"
            }),
            json!({
                "target": "page",
                "pageId": "63c720f9347c2139b248e552",
                "sourceCode": "window.dataLayer = window.dataLayer || [];",
                "displayName": "Data layer",
                "version": "2.1.0",
                "location": "footer"
            }),
        ]
    }

    async fn execute(&self, input: AddCustomCodeInput) -> AddCustomCodeOutput {
        if let Err(e) = input.preconditions() {
            return AddCustomCodeOutput::failed(None, "Cannot add custom code", &e);
        }
        let site_id = match self.ctx.resolve_site_id(input.site_id.as_deref()) {
            Ok(id) => id,
            Err(e) => return AddCustomCodeOutput::failed(None, "Cannot add custom code", &e),
        };

        let script_id = match self.register(&site_id, &input).await {
            Ok(id) => id,
            Err(e) => return AddCustomCodeOutput::failed(None, "Failed to register script", &e),
        };
        info!(site_id = %site_id, script_id = %script_id, "registered inline script");

        match self.apply(&site_id, &script_id, &input).await {
            Ok(applied_to) => {
                info!(script_id = %script_id, applied_to = %applied_to, "applied script");
                AddCustomCodeOutput {
                    success: true,
                    script_id: Some(script_id),
                    applied_to: Some(applied_to),
                    error: None,
                }
            }
            Err(e) => AddCustomCodeOutput::failed(Some(script_id), "Failed to apply script", &e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn input(target: CodeTarget, page_id: Option<&str>, source: &str) -> AddCustomCodeInput {
        AddCustomCodeInput {
            site_id: None,
            target,
            page_id: page_id.map(Into::into),
            source_code: source.into(),
            display_name: "Probe".into(),
            version: default_version(),
            location: ScriptLocation::default(),
        }
    }

    #[test]
    fn page_target_without_page_id_fails_first() {
        let long = "x".repeat(MAX_INLINE_SOURCE_CHARS + 1);
        let err = input(CodeTarget::Page, None, &long)
            .preconditions()
            .unwrap_err();
        assert!(err.to_string().contains("pageId is required"));
    }

    #[test]
    fn empty_page_id_counts_as_missing() {
        let err = input(CodeTarget::Page, Some(""), "a()").preconditions();
        assert!(matches!(err, Err(CoreError::Precondition { .. })));
    }

    #[test]
    fn source_length_counts_characters() {
        let at_limit = "é".repeat(MAX_INLINE_SOURCE_CHARS);
        assert!(input(CodeTarget::Site, None, &at_limit).preconditions().is_ok());

        let over = "é".repeat(MAX_INLINE_SOURCE_CHARS + 5);
        let msg = input(CodeTarget::Site, None, &over)
            .preconditions()
            .unwrap_err()
            .to_string();
        assert!(msg.contains("2005"));
        assert!(msg.contains("2000 character"));
    }

    #[test]
    fn defaults_apply_when_omitted() {
        let parsed: AddCustomCodeInput = crate::capability::decode_input(json!({
            "sourceCode": "a()",
            "displayName": "A"
        }))
        .unwrap_or_else(|e| panic!("should decode: {e}"));
        assert_eq!(parsed.target, CodeTarget::Site);
        assert_eq!(parsed.location, ScriptLocation::Header);
        assert_eq!(parsed.version, "1.0.0");
    }

    #[test]
    fn blank_display_name_is_invalid() {
        let result = crate::capability::decode_input::<AddCustomCodeInput>(json!({
            "sourceCode": "a()",
            "displayName": " "
        }));
        assert!(matches!(result, Err(CoreError::Validation { .. })));
    }
}
