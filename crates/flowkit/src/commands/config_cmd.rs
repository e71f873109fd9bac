//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", flowkit_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let config = flowkit_config::load_config()?;
            let active = config.active_profile_name(global.profile.as_deref());
            match global.output {
                OutputFormat::Text => {
                    eprintln!("# {}", flowkit_config::config_path().display());
                    eprintln!("# active profile: {active}");
                    print!("{}", config.to_redacted_toml()?);
                }
                OutputFormat::Json | OutputFormat::JsonCompact => {
                    let profiles = config.profile_names();
                    let summary = serde_json::json!({
                        "path": flowkit_config::config_path(),
                        "activeProfile": active,
                        "profiles": profiles,
                        "baseUrl": config.defaults.base_url,
                        "timeout": config.defaults.timeout,
                    });
                    super::util::print_json(&summary, global.output)?;
                }
            }
            Ok(())
        }
    }
}
