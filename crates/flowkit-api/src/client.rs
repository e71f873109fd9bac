// Hand-crafted async HTTP client for the Webflow Data API (v2).
//
// Base path: https://api.webflow.com/v2/
// Auth: Bearer token

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Production endpoint for the v2 Data API.
pub const DEFAULT_BASE_URL: &str = "https://api.webflow.com/v2";

// ── Call options ─────────────────────────────────────────────────────

/// Method, optional JSON body, and query parameters for a single call.
///
/// Parameters whose value is `None` are dropped when the URL is built,
/// so callers can pass optional arguments straight through.
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub params: Vec<(String, Option<String>)>,
}

impl CallOptions {
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            body: None,
            params: Vec::new(),
        }
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Method::POST,
            body: Some(body),
            params: Vec::new(),
        }
    }

    pub fn put(body: Value) -> Self {
        Self {
            method: Method::PUT,
            body: Some(body),
            params: Vec::new(),
        }
    }

    /// Append a query parameter; `None` values are omitted from the URL.
    pub fn param<V: ToString>(mut self, key: &str, value: Option<V>) -> Self {
        self.params
            .push((key.to_owned(), value.map(|v| v.to_string())));
        self
    }
}

// ── Request paths ────────────────────────────────────────────────────

/// Path below the base URL, held as segments.
///
/// Each segment is percent-encoded on its own when the URL is built, so an
/// id containing `/`, `?` or `#` stays inside its segment and can never
/// reach a different endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    /// Fixed path such as `"sites"` or `"custom_code/blocks"`, split on `/`.
    pub fn new(fixed: &str) -> Self {
        Self::default().then(fixed)
    }

    /// Append fixed segments, split on `/`.
    pub fn then(mut self, fixed: &str) -> Self {
        self.segments.extend(
            fixed
                .split('/')
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        );
        self
    }

    /// Append a caller-supplied identifier as exactly one segment.
    pub fn id(mut self, id: &str) -> Self {
        self.segments.push(id.to_owned());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl From<&str> for ApiPath {
    fn from(fixed: &str) -> Self {
        Self::new(fixed)
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Webflow Data API.
///
/// Every call carries the bearer token supplied at construction. A client
/// built without a token is still usable for wiring; calls fail with
/// [`Error::Configuration`] before touching the network.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL, optional bearer token, and transport config.
    pub fn new(
        base_url: &str,
        token: Option<SecretString>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, token, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(
        base_url: &str,
        token: Option<SecretString>,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Guarantee a trailing slash so relative joins append instead of replace.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::Configuration {
                message: format!("base URL {raw:?} cannot carry a path"),
            });
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    /// The normalized base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether a bearer token was configured.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &ApiPath, params: &[(String, Option<String>)]) -> Result<Url, Error> {
        // `extend` silently drops `.` and `..`, so refuse them here.
        if let Some(bad) = path
            .segments()
            .iter()
            .find(|s| matches!(s.as_str(), "" | "." | ".."))
        {
            return Err(Error::InvalidPath {
                segment: bad.clone(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Configuration {
                message: format!("base URL {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(path.segments());

        let present: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (k.as_str(), v)))
            .collect();
        if !present.is_empty() {
            url.query_pairs_mut().extend_pairs(present);
        }

        Ok(url)
    }

    // ── Calls ────────────────────────────────────────────────────────

    /// Issue one request and return the parsed JSON body.
    pub async fn call(&self, path: impl Into<ApiPath>, options: CallOptions) -> Result<Value, Error> {
        let path = path.into();
        let token = self.token.as_ref().ok_or_else(|| Error::Configuration {
            message: "Webflow API token is not set (WEBFLOW_API_TOKEN)".into(),
        })?;

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Configuration {
                message: format!("invalid API token header value: {e}"),
            })?;
        auth.set_sensitive(true);

        let url = self.url(&path, &options.params)?;
        debug!("{} {url}", options.method);

        let mut request = self
            .http
            .request(options.method, url)
            .header(AUTHORIZATION, auth)
            .header(ACCEPT, "application/json");
        if let Some(ref body) = options.body {
            request = request.json(body);
        }

        let resp = request.send().await?;
        Self::handle_response(resp).await
    }

    pub async fn get(&self, path: impl Into<ApiPath>) -> Result<Value, Error> {
        self.call(path, CallOptions::get()).await
    }

    pub async fn post(&self, path: impl Into<ApiPath>, body: Value) -> Result<Value, Error> {
        self.call(path, CallOptions::post(body)).await
    }

    pub async fn put(&self, path: impl Into<ApiPath>, body: Value) -> Result<Value, Error> {
        self.call(path, CallOptions::put(body)).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response(resp: reqwest::Response) -> Result<Value, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            let body = resp.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "upstream rejected request");
            Err(Error::Upstream {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::from_reqwest(base, None, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        assert_eq!(
            client("https://api.webflow.com/v2").base_url().as_str(),
            "https://api.webflow.com/v2/"
        );
        assert_eq!(
            client("https://api.webflow.com/v2/").base_url().as_str(),
            "https://api.webflow.com/v2/"
        );
    }

    #[test]
    fn url_joins_path_and_drops_absent_params() {
        let c = client(DEFAULT_BASE_URL);
        let opts = CallOptions::get()
            .param("limit", Some(10))
            .param("offset", None::<u32>)
            .param("elementId", Some("abc"));
        let url = c
            .url(&ApiPath::new("/sites/s1/form_submissions"), &opts.params)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.webflow.com/v2/sites/s1/form_submissions?limit=10&elementId=abc"
        );
    }

    #[test]
    fn url_without_params_has_no_query() {
        let c = client(DEFAULT_BASE_URL);
        let opts = CallOptions::get().param("offset", None::<u32>);
        let url = c.url(&ApiPath::new("sites"), &opts.params).unwrap();
        assert_eq!(url.as_str(), "https://api.webflow.com/v2/sites");
        assert!(url.query().is_none());
    }

    #[test]
    fn ids_stay_inside_their_segment() {
        let c = client(DEFAULT_BASE_URL);
        let path = ApiPath::new("pages").id("../sites/site-1/custom_code");
        let url = c.url(&path, &[]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.webflow.com/v2/pages/..%2Fsites%2Fsite-1%2Fcustom_code"
        );

        let path = ApiPath::new("pages").id("p1?localeId=evil#x");
        let url = c.url(&path, &[]).unwrap();
        assert_eq!(url.path(), "/v2/pages/p1%3FlocaleId=evil%23x");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());

        let path = ApiPath::new("sites").id("%2e%2e").then("pages");
        let url = c.url(&path, &[]).unwrap();
        assert_eq!(url.path(), "/v2/sites/%252e%252e/pages");
    }

    #[test]
    fn dot_and_empty_ids_are_rejected() {
        let c = client(DEFAULT_BASE_URL);
        for id in ["", ".", ".."] {
            let err = c.url(&ApiPath::new("pages").id(id), &[]).unwrap_err();
            assert!(matches!(err, Error::InvalidPath { ref segment } if segment == id));
        }
    }

    #[test]
    fn root_base_url_joins_cleanly() {
        let c = client("http://127.0.0.1:8080");
        let url = c.url(&ApiPath::new("sites").id("s1"), &[]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/sites/s1");
    }

    #[test]
    fn debug_output_redacts_token() {
        let c = ApiClient::from_reqwest(
            DEFAULT_BASE_URL,
            Some(SecretString::from("super-secret")),
            reqwest::Client::new(),
        )
        .unwrap();
        let rendered = format!("{c:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
