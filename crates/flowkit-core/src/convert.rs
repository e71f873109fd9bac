// ── Wire-to-domain conversions ──
//
// Bridges raw upstream JSON into canonical `flowkit_core::model` types.
// Each `From` impl goes through the normalizer so naming-convention drift,
// optional nested objects, and loose scalars are reconciled in one place.
// Conversions are total: a missing scalar becomes an empty string or `None`.

use serde_json::Value;

use crate::model::{
    CodeTarget, CustomCodeBlock, CustomDomain, Form, FormSubmission, Page, Script, ScriptLocation,
    Site,
};
use crate::normalize::{
    bool_field, dual_key, form_fields, list, string_field, title_description,
};

fn required(obj: &Value, key: &str) -> String {
    string_field(obj, key).unwrap_or_default()
}

fn created_on(obj: &Value) -> Option<String> {
    dual_key(obj, "created_on", "createdOn")
}

fn last_updated(obj: &Value) -> Option<String> {
    dual_key(obj, "last_updated", "lastUpdated")
}

// ── Site ───────────────────────────────────────────────────────────

impl From<&Value> for CustomDomain {
    fn from(raw: &Value) -> Self {
        CustomDomain {
            id: required(raw, "id"),
            url: required(raw, "url"),
        }
    }
}

/// Domains listed under `customDomains`, or `None` when the key is absent.
pub(crate) fn custom_domains(raw: &Value) -> Option<Vec<CustomDomain>> {
    raw.get("customDomains")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(CustomDomain::from).collect())
}

impl From<&Value> for Site {
    fn from(raw: &Value) -> Self {
        let short_name = dual_key(raw, "short_name", "shortName").unwrap_or_default();
        Site {
            id: required(raw, "id"),
            display_name: dual_key(raw, "display_name", "displayName").unwrap_or_default(),
            last_published: dual_key(raw, "last_published", "lastPublished"),
            last_updated: last_updated(raw),
            preview_url: dual_key(raw, "preview_url", "previewUrl"),
            time_zone: dual_key(raw, "time_zone", "timeZone"),
            designer_url: Site::designer_url_for(&short_name),
            settings_url: Site::settings_url_for(&short_name),
            custom_domains: custom_domains(raw),
            short_name,
        }
    }
}

// ── Page ───────────────────────────────────────────────────────────

impl From<&Value> for Page {
    fn from(raw: &Value) -> Self {
        Page {
            id: required(raw, "id"),
            title: required(raw, "title"),
            slug: required(raw, "slug"),
            archived: bool_field(raw, "archived"),
            draft: bool_field(raw, "draft"),
            created_on: created_on(raw),
            last_updated: last_updated(raw),
            published_path: dual_key(raw, "published_path", "publishedPath"),
            seo: title_description(raw.get("seo")),
            open_graph: title_description(raw.get("openGraph")),
        }
    }
}

// ── Forms ──────────────────────────────────────────────────────────

impl From<&Value> for Form {
    fn from(raw: &Value) -> Self {
        Form {
            id: required(raw, "id"),
            display_name: dual_key(raw, "display_name", "displayName").unwrap_or_default(),
            page_id: dual_key(raw, "page_id", "pageId"),
            page_name: dual_key(raw, "page_name", "pageName"),
            form_element_id: dual_key(raw, "form_element_id", "formElementId"),
            fields: form_fields(raw.get("fields")),
            created_on: created_on(raw),
            last_updated: last_updated(raw),
        }
    }
}

impl From<&Value> for FormSubmission {
    fn from(raw: &Value) -> Self {
        FormSubmission {
            id: required(raw, "id"),
            display_name: dual_key(raw, "display_name", "displayName"),
            date_submitted: dual_key(raw, "date_submitted", "dateSubmitted"),
            form_response: raw
                .get("formResponse")
                .or_else(|| raw.get("form_response"))
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

// ── Custom code ────────────────────────────────────────────────────

impl From<&Value> for Script {
    fn from(raw: &Value) -> Self {
        // Upstream's default placement is the document head.
        let location = string_field(raw, "location")
            .and_then(|l| l.parse::<ScriptLocation>().ok())
            .unwrap_or_default();
        Script {
            id: required(raw, "id"),
            location,
            version: required(raw, "version"),
        }
    }
}

impl From<&Value> for CustomCodeBlock {
    fn from(raw: &Value) -> Self {
        CustomCodeBlock {
            site_id: dual_key(raw, "site_id", "siteId").unwrap_or_default(),
            page_id: dual_key(raw, "page_id", "pageId"),
            block_type: string_field(raw, "type").and_then(|t| t.parse::<CodeTarget>().ok()),
            scripts: list(raw, "scripts").iter().map(Script::from).collect(),
            created_on: created_on(raw),
            last_updated: last_updated(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::model::TitleDescription;

    #[test]
    fn site_derives_urls_from_short_name() {
        let raw = json!({
            "id": "site-1",
            "displayName": "Marketing",
            "shortName": "marketing-co",
            "last_published": "2024-05-01T00:00:00Z",
            "lastUpdated": "2024-05-02T00:00:00Z",
            "timeZone": "Europe/Berlin",
            "customDomains": [{ "id": "d1", "url": "www.example.com" }]
        });
        let site = Site::from(&raw);
        assert_eq!(site.designer_url, "https://marketing-co.design.webflow.com");
        assert_eq!(
            site.settings_url,
            "https://webflow.com/dashboard/sites/marketing-co/general"
        );
        assert_eq!(site.last_published.as_deref(), Some("2024-05-01T00:00:00Z"));
        assert_eq!(site.last_updated.as_deref(), Some("2024-05-02T00:00:00Z"));
        assert_eq!(
            site.custom_domains,
            Some(vec![CustomDomain {
                id: "d1".into(),
                url: "www.example.com".into()
            }])
        );
        assert_eq!(site.preview_url, None);
    }

    #[test]
    fn site_without_domains_omits_key() {
        let site = Site::from(&json!({ "id": "s", "displayName": "S", "shortName": "s" }));
        let out = serde_json::to_value(&site).unwrap_or_default();
        assert!(out.get("customDomains").is_none());
        assert!(out.get("lastPublished").is_none());
    }

    #[test]
    fn page_keeps_metadata_states_distinct() {
        let raw = json!({
            "id": "p1",
            "title": "Home",
            "slug": "home",
            "draft": false,
            "createdOn": "2024-01-01T00:00:00Z",
            "seo": { "title": "T" },
            "openGraph": {}
        });
        let page = Page::from(&raw);
        assert_eq!(
            page.seo,
            Some(TitleDescription {
                title: Some("T".into()),
                description: None
            })
        );
        assert_eq!(page.open_graph, Some(TitleDescription::default()));
        assert_eq!(page.draft, Some(false));
        assert_eq!(page.archived, None);

        let out = serde_json::to_value(&page).unwrap_or_default();
        assert_eq!(out["openGraph"], json!({}));
        assert!(out.get("archived").is_none());
    }

    #[test]
    fn page_without_metadata_has_none() {
        let page = Page::from(&json!({ "id": "p1", "title": "A", "slug": "a" }));
        assert_eq!(page.seo, None);
        assert_eq!(page.open_graph, None);
    }

    #[test]
    fn form_without_fields_omits_mapping() {
        let form = Form::from(&json!({
            "id": "f1",
            "displayName": "Contact",
            "formElementId": "el-1",
            "fields": {}
        }));
        assert_eq!(form.fields, None);
        assert_eq!(form.form_element_id.as_deref(), Some("el-1"));
    }

    #[test]
    fn submission_passes_response_through() {
        let sub = FormSubmission::from(&json!({
            "id": "s1",
            "dateSubmitted": "2024-02-02T10:00:00Z",
            "formResponse": { "email": "a@b.c", "consent": true, "count": 3 }
        }));
        assert_eq!(sub.form_response["consent"], json!(true));
        assert_eq!(sub.form_response["count"], json!(3));
        assert_eq!(sub.display_name, None);
    }

    #[test]
    fn custom_code_block_scripts_in_order() {
        let block = CustomCodeBlock::from(&json!({
            "siteId": "site-1",
            "type": "page",
            "pageId": "p1",
            "scripts": [
                { "id": "a", "location": "footer", "version": "1.0.0" },
                { "id": "b", "location": "header", "version": "2.0.0" }
            ]
        }));
        assert_eq!(block.block_type, Some(CodeTarget::Page));
        assert_eq!(block.scripts.len(), 2);
        assert_eq!(block.scripts[0].id, "a");
        assert_eq!(block.scripts[0].location, ScriptLocation::Footer);
        assert_eq!(block.scripts[1].location, ScriptLocation::Header);
    }
}
