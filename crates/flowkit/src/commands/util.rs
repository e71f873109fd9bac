//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Ask before running an approval-gated capability.
///
/// `--yes` approves without asking. Without a terminal to ask on, the
/// call is refused rather than silently approved.
pub fn confirm(name: &str, prompt: &str, yes_flag: bool) -> Result<(), CliError> {
    if yes_flag {
        return Ok(());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes { name: name.into() });
    }

    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    if confirmed {
        Ok(())
    } else {
        Err(CliError::Declined { name: name.into() })
    }
}

/// Parse `--args` / `--args-file` into a JSON value. No arguments is `{}`.
pub fn read_args(inline: Option<&str>, file: Option<&Path>) -> Result<Value, CliError> {
    let text = match (inline, file) {
        (Some(inline), _) => inline.to_owned(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => return Ok(Value::Object(serde_json::Map::new())),
    };
    let value: Value = serde_json::from_str(&text)?;
    if value.is_object() || value.is_null() {
        Ok(value)
    } else {
        Err(CliError::Validation {
            field: "args".into(),
            reason: "expected a JSON object".into(),
        })
    }
}

/// Print a JSON value in the requested shape. `Text` falls back to pretty.
pub fn print_json(value: &Value, format: OutputFormat) -> Result<(), CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(value)?,
        OutputFormat::Text | OutputFormat::Json => serde_json::to_string_pretty(value)?,
    };
    println!("{rendered}");
    Ok(())
}
