#![allow(clippy::unwrap_used)]
// End-to-end capability tests against a wiremock upstream.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{any, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use flowkit_api::{ApiClient, TransportConfig};
use flowkit_core::{CapabilityRegistry, CoreError, ToolContext};

// ── Helpers ─────────────────────────────────────────────────────────

fn context(server: &MockServer, token: Option<&str>, default_site: Option<&str>) -> Arc<ToolContext> {
    let client = ApiClient::new(
        &server.uri(),
        token.map(SecretString::from),
        &TransportConfig::default(),
    )
    .unwrap();
    ToolContext::with_client(client, default_site.map(Into::into))
}

async fn setup() -> (MockServer, CapabilityRegistry) {
    let server = MockServer::start().await;
    let registry = CapabilityRegistry::new(&context(&server, Some("test-token"), Some("site-1")));
    (server, registry)
}

async fn forbid_network(server: &MockServer) {
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(server)
        .await;
}

async fn sent_body(server: &MockServer, index: usize) -> Value {
    let requests = server.received_requests().await.unwrap();
    serde_json::from_slice(&requests[index].body).unwrap()
}

fn assert_exclusive(out: &Value) {
    let success = out["success"].as_bool().unwrap();
    assert_eq!(success, out.get("error").is_none(), "success and error must be exclusive: {out}");
}

// ── Sites ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sites_counts_and_derives_urls() {
    let (server, registry) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sites": [
                { "id": "s1", "displayName": "Acme", "shortName": "acme", "lastPublished": "2024-05-01T00:00:00Z" },
                { "id": "s2", "displayName": "Blog", "shortName": "acme-blog" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry.invoke("list_sites", json!({})).await.unwrap();

    assert_eq!(out["count"], 2);
    assert_eq!(out["sites"].as_array().unwrap().len(), 2);
    assert_eq!(out["sites"][0]["designerUrl"], "https://acme.design.webflow.com");
    assert_eq!(
        out["sites"][1]["settingsUrl"],
        "https://webflow.com/dashboard/sites/acme-blog/general"
    );
    assert_eq!(out["sites"][0]["lastPublished"], "2024-05-01T00:00:00Z");
    assert!(out.get("error").is_none());
}

#[tokio::test]
async fn test_list_sites_without_token_reports_configuration() {
    let server = MockServer::start().await;
    forbid_network(&server).await;
    let registry = CapabilityRegistry::new(&context(&server, None, Some("site-1")));

    let out = registry.invoke("list_sites", Value::Null).await.unwrap();

    assert_eq!(out["count"], 0);
    assert_eq!(out["sites"], json!([]));
    let error = out["error"].as_str().unwrap();
    assert!(error.starts_with("Failed to list sites: "), "{error}");
    assert!(error.contains("token"), "{error}");
}

#[tokio::test]
async fn test_publish_defaults_subdomain_and_omits_domains() {
    let (server, registry) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sites/site-1/publish"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry.invoke("publish_site", json!({})).await.unwrap();

    assert_eq!(out, json!({ "success": true }));
    assert_eq!(
        sent_body(&server, 0).await,
        json!({ "publishToWebflowSubdomain": false })
    );
}

#[tokio::test]
async fn test_publish_to_custom_domains() {
    let (server, registry) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sites/other/publish"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customDomains": [{ "id": "d1", "url": "www.acme.test" }],
            "publishToWebflowSubdomain": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke(
            "publish_site",
            json!({ "siteId": "other", "publishToWebflowSubdomain": true, "customDomains": ["d1"] }),
        )
        .await
        .unwrap();

    assert_exclusive(&out);
    assert_eq!(out["customDomains"], json!([{ "id": "d1", "url": "www.acme.test" }]));
    assert_eq!(
        sent_body(&server, 0).await,
        json!({ "publishToWebflowSubdomain": true, "customDomains": ["d1"] })
    );
}

// ── Pages ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_pages_forwards_paging_and_normalizes() {
    let (server, registry) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sites/site-1/pages"))
        .and(query_param("limit", "10"))
        .and(query_param("offset", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "pages": [
                { "id": "p1", "title": "Home", "slug": "", "seo": { "title": "Acme" }, "openGraph": {} },
                { "id": "p2", "title": "About", "slug": "about", "archived": false, "created_on": "2024-01-01T00:00:00Z" }
            ],
            "pagination": { "limit": 10, "offset": 20, "total": "22" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke("list_pages", json!({ "limit": 10, "offset": 20 }))
        .await
        .unwrap();

    assert_eq!(out["count"], 2);
    assert_eq!(out["pagination"], json!({ "limit": 10, "offset": 20, "total": 22 }));
    assert_eq!(out["pages"][0]["seo"], json!({ "title": "Acme" }));
    assert_eq!(out["pages"][0]["openGraph"], json!({}));
    assert!(out["pages"][1].get("seo").is_none());
    assert_eq!(out["pages"][1]["createdOn"], "2024-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_list_pages_omits_absent_paging() {
    let (server, registry) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sites/explicit/pages"))
        .and(query_param_is_missing("limit"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pages": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke("list_pages", json!({ "siteId": "explicit" }))
        .await
        .unwrap();

    assert_eq!(out, json!({ "pages": [], "count": 0 }));
}

#[tokio::test]
async fn test_list_pages_upstream_404_mentions_status() {
    let (server, registry) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sites/site-1/pages"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"message":"Resource not found"}"#))
        .mount(&server)
        .await;

    let out = registry.invoke("list_pages", json!({})).await.unwrap();

    assert_eq!(out["pages"], json!([]));
    assert_eq!(out["count"], 0);
    let error = out["error"].as_str().unwrap();
    assert!(error.contains("404"), "{error}");
    assert!(error.contains("Resource not found"), "{error}");
}

#[tokio::test]
async fn test_list_pages_without_site_makes_no_call() {
    let server = MockServer::start().await;
    forbid_network(&server).await;
    let registry = CapabilityRegistry::new(&context(&server, Some("test-token"), None));

    let out = registry.invoke("list_pages", json!({})).await.unwrap();

    assert_eq!(out["count"], 0);
    assert!(out["error"].as_str().unwrap().contains("siteId"));
}

#[tokio::test]
async fn test_update_page_sends_only_supplied_fields() {
    let (server, registry) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/pages/p1"))
        .and(query_param_is_missing("localeId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1", "title": "New title", "slug": "about"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke("update_page", json!({ "pageId": "p1", "title": "New title" }))
        .await
        .unwrap();

    assert_exclusive(&out);
    assert_eq!(out["page"]["title"], "New title");
    assert_eq!(sent_body(&server, 0).await, json!({ "title": "New title" }));
}

#[tokio::test]
async fn test_update_page_nested_metadata_and_locale() {
    let (server, registry) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/pages/p1"))
        .and(query_param("localeId", "fr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "p1" })))
        .expect(1)
        .mount(&server)
        .await;

    registry
        .invoke(
            "update_page",
            json!({ "pageId": "p1", "localeId": "fr", "seo": { "description": "Bonjour" } }),
        )
        .await
        .unwrap();

    assert_eq!(
        sent_body(&server, 0).await,
        json!({ "seo": { "description": "Bonjour" } })
    );
}

#[tokio::test]
async fn test_update_page_failure_has_no_page() {
    let (server, registry) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/pages/p1"))
        .respond_with(ResponseTemplate::new(409).set_body_string("slug already in use"))
        .mount(&server)
        .await;

    let out = registry
        .invoke("update_page", json!({ "pageId": "p1", "slug": "taken" }))
        .await
        .unwrap();

    assert_exclusive(&out);
    assert_eq!(out["success"], false);
    assert!(out.get("page").is_none());
    assert!(out["error"].as_str().unwrap().starts_with("Failed to update page: "));
}

// ── Forms ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_forms_keeps_fields() {
    let (server, registry) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sites/site-1/forms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "forms": [
                {
                    "id": "f1",
                    "displayName": "Contact",
                    "formElementId": "el-1",
                    "fields": { "email": { "displayName": "Email", "type": "Email" } }
                },
                { "id": "f2", "displayName": "Empty", "fields": {} }
            ]
        })))
        .mount(&server)
        .await;

    let out = registry.invoke("list_forms", json!({})).await.unwrap();

    assert_eq!(out["count"], 2);
    assert_eq!(
        out["forms"][0]["fields"],
        json!({ "email": { "displayName": "Email", "type": "Email" } })
    );
    assert!(out["forms"][1].get("fields").is_none());
}

#[tokio::test]
async fn test_list_form_submissions_filters_by_element() {
    let (server, registry) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sites/site-1/form_submissions"))
        .and(query_param("elementId", "el-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "formSubmissions": [
                { "id": "sub-1", "dateSubmitted": "2024-03-03T12:00:00Z", "formResponse": { "email": "a@b.test" } }
            ],
            "pagination": { "limit": 100, "offset": 0, "total": 1 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke("list_form_submissions", json!({ "elementId": "el-1" }))
        .await
        .unwrap();

    assert_eq!(out["count"], 1);
    assert_eq!(out["formSubmissions"][0]["formResponse"]["email"], "a@b.test");
    assert_eq!(out["pagination"]["total"], 1);
}

// ── Custom code ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_custom_code_blocks() {
    let (server, registry) = setup().await;

    Mock::given(method("GET"))
        .and(path("/sites/site-1/custom_code/blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "blocks": [{
                "siteId": "site-1",
                "type": "site",
                "scripts": [{ "id": "analytics", "location": "footer", "version": "0.1.0" }]
            }]
        })))
        .mount(&server)
        .await;

    let out = registry.invoke("list_custom_code", json!({})).await.unwrap();

    assert_eq!(out["count"], 1);
    assert_eq!(out["blocks"][0]["type"], "site");
    assert_eq!(out["blocks"][0]["scripts"][0]["location"], "footer");
}

#[tokio::test]
async fn test_add_custom_code_page_target_requires_page_id() {
    let (server, registry) = setup().await;
    forbid_network(&server).await;

    let out = registry
        .invoke(
            "add_custom_code",
            json!({
                "target": "page",
                "sourceCode": "x".repeat(2500),
                "displayName": "Too long and no page"
            }),
        )
        .await
        .unwrap();

    assert_eq!(out["success"], false);
    assert!(out.get("scriptId").is_none());
    let error = out["error"].as_str().unwrap();
    assert!(error.contains("pageId is required"), "{error}");
}

#[tokio::test]
async fn test_add_custom_code_rejects_long_source() {
    let (server, registry) = setup().await;
    forbid_network(&server).await;

    let out = registry
        .invoke(
            "add_custom_code",
            json!({ "sourceCode": "y".repeat(2001), "displayName": "Long" }),
        )
        .await
        .unwrap();

    assert_eq!(out["success"], false);
    let error = out["error"].as_str().unwrap();
    assert!(error.contains("2001"), "{error}");
    assert!(error.contains("2000 character"), "{error}");
}

#[tokio::test]
async fn test_add_custom_code_site_happy_path() {
    let (server, registry) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sites/site-1/registered_scripts/inline"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "script-123", "displayName": "Hello", "version": "1.0.0"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/sites/site-1/custom_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "scripts": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke(
            "add_custom_code",
            json!({ "sourceCode": "console.log('hi');", "displayName": "Hello" }),
        )
        .await
        .unwrap();

    assert_eq!(
        out,
        json!({ "success": true, "scriptId": "script-123", "appliedTo": "site:site-1" })
    );

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method.to_string(), "POST");
    assert_eq!(requests[1].method.to_string(), "PUT");
    assert_eq!(
        sent_body(&server, 0).await,
        json!({ "sourceCode": "console.log('hi');", "version": "1.0.0", "displayName": "Hello" })
    );
    assert_eq!(
        sent_body(&server, 1).await,
        json!({ "scripts": [{ "id": "script-123", "location": "header", "version": "1.0.0" }] })
    );
}

#[tokio::test]
async fn test_add_custom_code_page_happy_path() {
    let (server, registry) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sites/site-1/registered_scripts/inline"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "script-123" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/pages/p9/custom_code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke(
            "add_custom_code",
            json!({
                "target": "page",
                "pageId": "p9",
                "sourceCode": "track();",
                "displayName": "Tracker",
                "version": "2.0.0",
                "location": "footer"
            }),
        )
        .await
        .unwrap();

    assert_eq!(out["appliedTo"], "page:p9");
    assert_eq!(out["scriptId"], "script-123");
    assert_eq!(
        sent_body(&server, 1).await,
        json!({ "scripts": [{ "id": "script-123", "location": "footer", "version": "2.0.0" }] })
    );
}

#[tokio::test]
async fn test_add_custom_code_missing_script_id_stops() {
    let (server, registry) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sites/site-1/registered_scripts/inline"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "displayName": "Hello" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let out = registry
        .invoke("add_custom_code", json!({ "sourceCode": "a();", "displayName": "Hello" }))
        .await
        .unwrap();

    assert_exclusive(&out);
    assert!(out.get("scriptId").is_none());
    assert!(out["error"].as_str().unwrap().contains("no script identifier returned"));
}

#[tokio::test]
async fn test_add_custom_code_apply_failure_keeps_script_id() {
    let (server, registry) = setup().await;

    Mock::given(method("POST"))
        .and(path("/sites/site-1/registered_scripts/inline"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "script-123" })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/sites/site-1/custom_code"))
        .respond_with(ResponseTemplate::new(400).set_body_string("script limit reached"))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke("add_custom_code", json!({ "sourceCode": "a();", "displayName": "Hello" }))
        .await
        .unwrap();

    assert_eq!(out["success"], false);
    assert_eq!(out["scriptId"], "script-123");
    assert!(out.get("appliedTo").is_none());
    let error = out["error"].as_str().unwrap();
    assert!(error.contains("400"), "{error}");
    assert!(error.contains("script limit reached"), "{error}");
}

// ── Identifiers in request paths ────────────────────────────────────

async fn request_paths(server: &MockServer) -> Vec<(String, Option<String>)> {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| (r.url.path().to_owned(), r.url.query().map(ToOwned::to_owned)))
        .collect()
}

#[tokio::test]
async fn test_update_page_id_stays_one_segment() {
    let (server, registry) = setup().await;

    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "p1", "title": "x", "slug": "x"
        })))
        .expect(2)
        .mount(&server)
        .await;

    for page_id in ["../sites/site-1/custom_code", "p1?localeId=evil"] {
        registry
            .invoke("update_page", json!({ "pageId": page_id, "title": "x" }))
            .await
            .unwrap();
    }

    assert_eq!(
        request_paths(&server).await,
        vec![
            ("/pages/..%2Fsites%2Fsite-1%2Fcustom_code".to_owned(), None),
            ("/pages/p1%3FlocaleId=evil".to_owned(), None),
        ]
    );
}

#[tokio::test]
async fn test_site_id_with_fragment_is_encoded() {
    let (server, registry) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "pages": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let out = registry
        .invoke("list_pages", json!({ "siteId": "a#frag" }))
        .await
        .unwrap();

    assert_eq!(out["count"], 0);
    assert_eq!(
        request_paths(&server).await,
        vec![("/sites/a%23frag/pages".to_owned(), None)]
    );
}

#[tokio::test]
async fn test_dot_segment_ids_make_no_call() {
    let (server, registry) = setup().await;
    forbid_network(&server).await;

    let out = registry
        .invoke("update_page", json!({ "pageId": "..", "title": "x" }))
        .await
        .unwrap();
    assert_exclusive(&out);
    assert_eq!(out["success"], false);
    assert!(out["error"].as_str().unwrap().starts_with("Failed to update page: "));

    let out = registry
        .invoke(
            "add_custom_code",
            json!({ "siteId": ".", "sourceCode": "1", "displayName": "x" }),
        )
        .await
        .unwrap();
    assert_eq!(out["success"], false);
    assert!(out.get("scriptId").is_none());
}

// ── List invariants ─────────────────────────────────────────────────

/// (capability, upstream path, list key in both upstream and output)
const LIST_CAPABILITIES: [(&str, &str, &str); 5] = [
    ("list_sites", "/sites", "sites"),
    ("list_pages", "/sites/site-1/pages", "pages"),
    ("list_forms", "/sites/site-1/forms", "forms"),
    ("list_form_submissions", "/sites/site-1/form_submissions", "formSubmissions"),
    ("list_custom_code", "/sites/site-1/custom_code/blocks", "blocks"),
];

#[tokio::test]
async fn test_every_list_counts_an_empty_upstream() {
    for (name, upstream, key) in LIST_CAPABILITIES {
        let (server, registry) = setup().await;
        Mock::given(method("GET"))
            .and(path(upstream))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ (key): [] })))
            .expect(1)
            .mount(&server)
            .await;

        let out = registry.invoke(name, json!({})).await.unwrap();

        assert_eq!(out["count"], 0, "{name}");
        assert_eq!(out[key], json!([]), "{name}");
        assert!(out.get("error").is_none(), "{name}: {out}");
    }
}

#[tokio::test]
async fn test_every_list_reports_an_upstream_rejection() {
    for (name, upstream, key) in LIST_CAPABILITIES {
        let (server, registry) = setup().await;
        Mock::given(method("GET"))
            .and(path(upstream))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .expect(1)
            .mount(&server)
            .await;

        let out = registry.invoke(name, json!({})).await.unwrap();

        assert_eq!(out["count"], 0, "{name}");
        assert_eq!(out[key], json!([]), "{name}");
        let error = out["error"].as_str().unwrap();
        assert!(error.starts_with("Failed to list "), "{name}: {error}");
        assert!(error.contains("403") && error.contains("forbidden"), "{name}: {error}");
    }
}

// ── Argument validation ─────────────────────────────────────────────

#[tokio::test]
async fn test_invalid_arguments_never_reach_upstream() {
    let (server, registry) = setup().await;
    forbid_network(&server).await;

    let cases = [
        ("list_pages", json!({ "limit": 0 })),
        ("list_forms", json!({ "limit": 101 })),
        ("list_custom_code", json!({ "limit": -1 })),
        ("list_sites", json!({ "unexpected": true })),
        ("update_page", json!({ "title": "No page id" })),
        ("update_page", json!({ "pageId": "" })),
        ("add_custom_code", json!({ "sourceCode": "a();" })),
        ("add_custom_code", json!({ "sourceCode": "a();", "displayName": "A", "location": "body" })),
        ("publish_site", json!({ "customDomains": [""] })),
    ];

    for (name, args) in cases {
        let result = registry.invoke(name, args.clone()).await;
        assert!(
            matches!(result, Err(CoreError::Validation { .. })),
            "{name} {args} should be rejected, got: {result:?}"
        );
    }
}

#[tokio::test]
async fn test_every_example_is_accepted() {
    let (server, registry) = setup().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    for descriptor in registry.descriptors() {
        for example in descriptor.examples {
            let result = registry.invoke(&descriptor.name, example.clone()).await;
            assert!(result.is_ok(), "{} rejected its own example {example}", descriptor.name);
        }
    }
}
