//! CLI flag overrides layered on top of `flowkit-config` profiles.
//!
//! Core never sees these types; it receives a finished `ToolConfig`.

use std::time::Duration;

use secrecy::SecretString;

use flowkit_config::{Config, validate_base_url};
use flowkit_core::ToolConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile and apply `--site`, `--api-token`,
/// `--base-url`, and `--timeout` on top.
pub fn build_tool_config(global: &GlobalOpts, config: &Config) -> Result<ToolConfig, CliError> {
    let (profile_name, profile) = config.select_profile(global.profile.as_deref())?;
    tracing::debug!(profile = %profile_name, "resolved profile");

    let mut tool_config = flowkit_config::profile_to_tool_config(&profile, &config.defaults)?;

    if let Some(ref token) = global.api_token {
        tool_config.api_token = Some(SecretString::from(token.clone()));
    }
    if let Some(ref site) = global.site {
        tool_config.default_site_id = Some(site.clone());
    }
    if let Some(ref base_url) = global.base_url {
        validate_base_url(base_url)?;
        tool_config.base_url.clone_from(base_url);
    }
    if let Some(seconds) = global.timeout {
        tool_config.timeout = Duration::from_secs(seconds);
    }

    Ok(tool_config)
}
