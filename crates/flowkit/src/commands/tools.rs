//! Capability discovery and invocation.

use std::sync::Arc;

use serde_json::Value;

use flowkit_core::{Capability, CapabilityRegistry, ToolContext};

use super::util;
use crate::cli::{DescribeArgs, GlobalOpts, InvokeArgs, OutputFormat, ToolsArgs};
use crate::error::CliError;

fn lookup<'a>(registry: &'a CapabilityRegistry, name: &str) -> Result<&'a Arc<dyn Capability>, CliError> {
    registry.get(name).ok_or_else(|| CliError::UnknownCapability {
        name: name.to_owned(),
        available: registry.names().join(", "),
    })
}

fn approval_marker(requires_approval: bool) -> &'static str {
    if requires_approval { "approval" } else { "-" }
}

// ── tools ───────────────────────────────────────────────────────────

pub fn list(ctx: &Arc<ToolContext>, args: &ToolsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let registry = CapabilityRegistry::with_preset(ctx, args.preset);

    match global.output {
        OutputFormat::Text => {
            let width = registry.iter().map(|c| c.name().len()).max().unwrap_or(0);
            for capability in registry.iter() {
                println!(
                    "{:<width$}  {:<8}  {}",
                    capability.name(),
                    approval_marker(capability.requires_approval()),
                    first_sentence(capability.description()),
                );
            }
            Ok(())
        }
        format => {
            let descriptors = serde_json::to_value(registry.descriptors())?;
            util::print_json(&descriptors, format)
        }
    }
}

fn first_sentence(text: &str) -> &str {
    text.split_once(". ").map_or(text, |(head, _)| head)
}

// ── describe ────────────────────────────────────────────────────────

pub fn describe(ctx: &Arc<ToolContext>, args: &DescribeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let registry = CapabilityRegistry::new(ctx);
    let descriptor = lookup(&registry, &args.name)?.descriptor();

    if global.output != OutputFormat::Text {
        return util::print_json(&serde_json::to_value(&descriptor)?, global.output);
    }

    let gate = if descriptor.requires_approval {
        "  (requires approval)"
    } else {
        ""
    };
    println!("{}{gate}\n", descriptor.name);
    println!("{}\n", descriptor.description);
    println!("Input schema:\n{}\n", serde_json::to_string_pretty(&descriptor.input_schema)?);
    println!("Output schema:\n{}\n", serde_json::to_string_pretty(&descriptor.output_schema)?);
    println!("Examples:");
    for example in &descriptor.examples {
        println!("  flowkit invoke {} --args '{example}'", descriptor.name);
    }
    Ok(())
}

// ── invoke ──────────────────────────────────────────────────────────

pub async fn invoke(ctx: &Arc<ToolContext>, args: InvokeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let registry = CapabilityRegistry::new(ctx);
    let capability = lookup(&registry, &args.name)?;
    let input = util::read_args(args.args.as_deref(), args.args_file.as_deref())?;

    if capability.requires_approval() {
        let prompt = format!("Run {} with {input}?", capability.name());
        util::confirm(capability.name(), &prompt, global.yes)?;
    }

    let output = capability
        .invoke(input)
        .await
        .map_err(|e| CliError::from_invoke(&args.name, e))?;

    util::print_json(&output, global.output)?;

    match output.get("error").and_then(Value::as_str) {
        Some(message) => Err(CliError::CapabilityFailed {
            name: args.name,
            message: message.to_owned(),
        }),
        None => Ok(()),
    }
}
