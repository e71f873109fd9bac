// ── Runtime capability configuration ──
//
// These types describe *how* capabilities reach the platform. They carry
// the credential and default site, but never touch disk or the process
// environment. The CLI (via `flowkit-config`) builds a `ToolConfig` once
// and hands it in.

use std::sync::Arc;
use std::time::Duration;

use flowkit_api::{ApiClient, DEFAULT_BASE_URL, TransportConfig};
use secrecy::SecretString;

use crate::error::CoreError;

/// Process-wide settings consumed when capabilities are constructed.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Bearer token. Absence is reported on first call, not here.
    pub api_token: Option<SecretString>,
    /// Site used when a capability is invoked without an explicit `siteId`.
    pub default_site_id: Option<String>,
    /// API root, e.g. `https://api.webflow.com/v2`.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            default_site_id: None,
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl ToolConfig {
    pub fn with_token(mut self, token: SecretString) -> Self {
        self.api_token = Some(token);
        self
    }

    pub fn with_default_site(mut self, site_id: impl Into<String>) -> Self {
        self.default_site_id = Some(site_id.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Shared, read-only state every capability holds a handle to.
#[derive(Debug)]
pub struct ToolContext {
    client: ApiClient,
    default_site_id: Option<String>,
}

impl ToolContext {
    /// Build the HTTP client described by `config`.
    pub fn from_config(config: &ToolConfig) -> Result<Arc<Self>, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = ApiClient::new(&config.base_url, config.api_token.clone(), &transport)?;
        Ok(Self::with_client(client, config.default_site_id.clone()))
    }

    /// Wrap an already-built client.
    pub fn with_client(client: ApiClient, default_site_id: Option<String>) -> Arc<Self> {
        Arc::new(Self {
            client,
            default_site_id: default_site_id.filter(|s| !s.is_empty()),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn default_site_id(&self) -> Option<&str> {
        self.default_site_id.as_deref()
    }

    /// Explicit non-empty id wins, then the configured default.
    pub fn resolve_site_id(&self, explicit: Option<&str>) -> Result<String, CoreError> {
        explicit
            .filter(|s| !s.is_empty())
            .or(self.default_site_id.as_deref())
            .map(ToOwned::to_owned)
            .ok_or_else(|| CoreError::Configuration {
                message: "no siteId supplied and no default site configured (WEBFLOW_SITE_ID)"
                    .into(),
            })
    }
}
