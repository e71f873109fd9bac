//! Clap derive structures for the `flowkit` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use flowkit_core::Preset;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// flowkit -- discover and invoke Webflow agent capabilities
#[derive(Debug, Parser)]
#[command(
    name = "flowkit",
    version,
    about = "Discover and invoke Webflow CMS capabilities from the command line",
    long_about = "Exposes the same typed capabilities an agent orchestrator uses:\n\
        list them, inspect their schemas, and invoke them with JSON arguments.\n\
        Capabilities that change a live site ask for confirmation first.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "FLOWKIT_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Default site id (overrides profile)
    #[arg(long, short = 's', global = true)]
    pub site: Option<String>,

    /// API token (overrides profile and WEBFLOW_API_TOKEN)
    #[arg(long, global = true, hide = true)]
    pub api_token: Option<String>,

    /// API root URL (overrides profile)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(long, short = 'o', default_value = "text", global = true)]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary (default)
    Text,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List available capabilities
    #[command(alias = "ls")]
    Tools(ToolsArgs),

    /// Show a capability's description, schemas, and examples
    Describe(DescribeArgs),

    /// Invoke a capability with JSON arguments
    #[command(alias = "run")]
    Invoke(InvokeArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Capability commands ─────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ToolsArgs {
    /// Capability subset: all, read_only, sites, pages, forms, custom_code
    #[arg(long, default_value = "all")]
    pub preset: Preset,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Capability name, e.g. list_pages
    pub name: String,
}

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// Capability name, e.g. update_page
    pub name: String,

    /// Arguments as a JSON object
    #[arg(long, short = 'a', conflicts_with = "args_file")]
    pub args: Option<String>,

    /// Read arguments from a JSON file
    #[arg(long, short = 'F')]
    pub args_file: Option<PathBuf>,
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Display the loaded configuration (tokens redacted)
    Show,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
