//! Shared configuration for flowkit.
//!
//! TOML profiles, credential resolution (env indirection + well-known env
//! var + plaintext), and translation to `flowkit_core::ToolConfig`. The
//! CLI layers its own flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flowkit_core::ToolConfig;

/// Environment variable consulted for the API token when a profile does
/// not name its own.
pub const TOKEN_ENV: &str = "WEBFLOW_API_TOKEN";

/// Environment variable consulted for the default site id.
pub const SITE_ENV: &str = "WEBFLOW_SITE_ID";

const REDACTED: &str = "<redacted>";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{name}' not found (available: {available})")]
    UnknownProfile { name: String, available: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is requested.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account/site profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    flowkit_core::DEFAULT_BASE_URL.into()
}
fn default_timeout() -> u64 {
    30
}

/// A named profile: one token, optionally pinned to one site.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// API root override (e.g. a proxy).
    pub base_url: Option<String>,

    /// Site used when a capability is called without `siteId`.
    pub site_id: Option<String>,

    /// API token (plaintext, prefer `api_token_env`).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,
}

impl Config {
    /// Name of the profile in effect: the requested one, else the
    /// configured default, else `"default"`.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
            .to_owned()
    }

    /// Look up the active profile.
    ///
    /// A missing profile is only an error when it was asked for by name;
    /// otherwise an empty profile is returned so env-only setups work.
    pub fn select_profile(&self, requested: Option<&str>) -> Result<(String, Profile), ConfigError> {
        let name = self.active_profile_name(requested);
        match self.profiles.get(&name) {
            Some(profile) => Ok((name, profile.clone())),
            None if requested.is_some() => Err(ConfigError::UnknownProfile {
                available: self.profile_names().join(", "),
                name,
            }),
            None => Ok((name, Profile::default())),
        }
    }

    /// Sorted profile names.
    pub fn profile_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }

    /// Render as TOML with plaintext tokens masked.
    pub fn to_redacted_toml(&self) -> Result<String, ConfigError> {
        let mut shown = self.clone();
        for profile in shown.profiles.values_mut() {
            if profile.api_token.is_some() {
                profile.api_token = Some(REDACTED.into());
            }
        }
        Ok(toml::to_string_pretty(&shown)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "flowkit", "flowkit").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("flowkit");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` (missing file is fine) merged with `FLOWKIT_*` env.
///
/// Nested keys use a double underscore, e.g.
/// `FLOWKIT_PROFILES__STAGING__SITE_ID`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FLOWKIT_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the API token from the process environment and the profile.
pub fn resolve_token(profile: &Profile) -> Option<SecretString> {
    resolve_token_with(profile, |name| std::env::var(name).ok())
}

/// Credential chain with an injectable environment lookup:
///
/// 1. the variable named by `api_token_env`
/// 2. `WEBFLOW_API_TOKEN`
/// 3. plaintext `api_token`
///
/// No token is not an error here; the first API call reports it.
pub fn resolve_token_with<F>(profile: &Profile, lookup: F) -> Option<SecretString>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    profile
        .api_token_env
        .as_deref()
        .and_then(|name| non_empty(lookup(name)))
        .or_else(|| non_empty(lookup(TOKEN_ENV)))
        .or_else(|| non_empty(profile.api_token.clone()))
        .map(SecretString::from)
}

/// Default site: the profile's `site_id`, else `WEBFLOW_SITE_ID`.
pub fn resolve_site_id_with<F>(profile: &Profile, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    profile
        .site_id
        .clone()
        .or_else(|| lookup(SITE_ENV))
        .filter(|s| !s.is_empty())
}

/// Build a `ToolConfig` from a profile, reading the process environment.
pub fn profile_to_tool_config(profile: &Profile, defaults: &Defaults) -> Result<ToolConfig, ConfigError> {
    profile_to_tool_config_with(profile, defaults, |name| std::env::var(name).ok())
}

pub fn profile_to_tool_config_with<F>(
    profile: &Profile,
    defaults: &Defaults,
    lookup: F,
) -> Result<ToolConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base_url = profile
        .base_url
        .clone()
        .unwrap_or_else(|| defaults.base_url.clone());
    validate_base_url(&base_url)?;

    Ok(ToolConfig {
        api_token: resolve_token_with(profile, &lookup),
        default_site_id: resolve_site_id_with(profile, &lookup),
        base_url,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    })
}

/// The API root must be an absolute http(s) URL.
pub fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let url: url::Url = raw.parse().map_err(|_| ConfigError::Validation {
        field: "base_url".into(),
        reason: format!("invalid URL: {raw}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation {
            field: "base_url".into(),
            reason: format!("unsupported scheme '{other}' in {raw}"),
        }),
    }
}
