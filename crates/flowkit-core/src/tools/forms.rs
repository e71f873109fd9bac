// Form capabilities: form definitions and their submissions.

use std::sync::Arc;

use async_trait::async_trait;
use flowkit_api::{ApiPath, CallOptions};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::capability::{Outcome, Tool, Validate, check_limit};
use crate::config::ToolContext;
use crate::error::{CoreError, failure_message};
use crate::model::{Form, FormSubmission, Pagination};
use crate::normalize::{list, pagination};

// ── list_forms ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListFormsInput {
    #[serde(default)]
    pub site_id: Option<String>,
    /// Page size, 1 to 100.
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl Validate for ListFormsInput {
    fn validate(&self) -> Result<(), CoreError> {
        check_limit(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListFormsOutput {
    pub forms: Vec<Form>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome for ListFormsOutput {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

pub struct ListForms {
    ctx: Arc<ToolContext>,
}

impl ListForms {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    async fn fetch(&self, input: &ListFormsInput) -> Result<(Vec<Form>, Option<Pagination>), CoreError> {
        let site_id = self.ctx.resolve_site_id(input.site_id.as_deref())?;
        let options = CallOptions::get()
            .param("limit", input.limit)
            .param("offset", input.offset);
        let body = self
            .ctx
            .client()
            .call(ApiPath::new("sites").id(&site_id).then("forms"), options)
            .await?;

        let forms = list(&body, "forms").iter().map(Form::from).collect();
        Ok((forms, pagination(body.get("pagination"))))
    }
}

#[async_trait]
impl Tool for ListForms {
    type Input = ListFormsInput;
    type Output = ListFormsOutput;

    const NAME: &'static str = "list_forms";
    const DESCRIPTION: &'static str = "List the forms on a Webflow site with the page they live \
        on, their form element id, and their field definitions.";
    const REQUIRES_APPROVAL: bool = false;

    fn examples(&self) -> Vec<Value> {
        vec![json!({}), json!({ "limit": 10 })]
    }

    async fn execute(&self, input: ListFormsInput) -> ListFormsOutput {
        match self.fetch(&input).await {
            Ok((forms, pagination)) => ListFormsOutput {
                count: forms.len(),
                forms,
                pagination,
                error: None,
            },
            Err(e) => ListFormsOutput {
                forms: Vec::new(),
                count: 0,
                pagination: None,
                error: Some(failure_message("Failed to list forms", &e)),
            },
        }
    }
}

// ── list_form_submissions ───────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListFormSubmissionsInput {
    #[serde(default)]
    pub site_id: Option<String>,
    /// Restrict to one form, by its `formElementId`.
    #[serde(default)]
    pub element_id: Option<String>,
    /// Page size, 1 to 100.
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

impl Validate for ListFormSubmissionsInput {
    fn validate(&self) -> Result<(), CoreError> {
        check_limit(self.limit)
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFormSubmissionsOutput {
    pub form_submissions: Vec<FormSubmission>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome for ListFormSubmissionsOutput {
    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Lists submissions across a site, optionally narrowed to one form.
pub struct ListFormSubmissions {
    ctx: Arc<ToolContext>,
}

impl ListFormSubmissions {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }

    async fn fetch(
        &self,
        input: &ListFormSubmissionsInput,
    ) -> Result<(Vec<FormSubmission>, Option<Pagination>), CoreError> {
        let site_id = self.ctx.resolve_site_id(input.site_id.as_deref())?;
        let element_id = input.element_id.as_deref().filter(|id| !id.is_empty());
        let options = CallOptions::get()
            .param("elementId", element_id)
            .param("limit", input.limit)
            .param("offset", input.offset);
        let body = self
            .ctx
            .client()
            .call(ApiPath::new("sites").id(&site_id).then("form_submissions"), options)
            .await?;

        let submissions = list(&body, "formSubmissions")
            .iter()
            .map(FormSubmission::from)
            .collect();
        Ok((submissions, pagination(body.get("pagination"))))
    }
}

#[async_trait]
impl Tool for ListFormSubmissions {
    type Input = ListFormSubmissionsInput;
    type Output = ListFormSubmissionsOutput;

    const NAME: &'static str = "list_form_submissions";
    const DESCRIPTION: &'static str = "List form submissions for a Webflow site. Pass elementId \
        (a form's formElementId from list_forms) to see submissions for a single form.";
    const REQUIRES_APPROVAL: bool = false;

    fn examples(&self) -> Vec<Value> {
        vec![
            json!({}),
            json!({ "elementId": "6321ca84df3949bfc6752327", "limit": 25 }),
        ]
    }

    async fn execute(&self, input: ListFormSubmissionsInput) -> ListFormSubmissionsOutput {
        match self.fetch(&input).await {
            Ok((form_submissions, pagination)) => ListFormSubmissionsOutput {
                count: form_submissions.len(),
                form_submissions,
                pagination,
                error: None,
            },
            Err(e) => ListFormSubmissionsOutput {
                form_submissions: Vec::new(),
                count: 0,
                pagination: None,
                error: Some(failure_message("Failed to list form submissions", &e)),
            },
        }
    }
}
