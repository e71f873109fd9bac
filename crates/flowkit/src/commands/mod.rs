//! Command dispatch: bridges CLI args -> capability registry -> output.

pub mod config_cmd;
pub mod tools;
pub mod util;

use std::sync::Arc;

use flowkit_core::ToolContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a capability command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &Arc<ToolContext>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Tools(args) => tools::list(ctx, &args, global),
        Command::Describe(args) => tools::describe(ctx, &args, global),
        Command::Invoke(args) => tools::invoke(ctx, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
