//! `sprout config`: inspect configuration.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Path => {
            output.print(&AppConfig::config_path()?.display().to_string())?;
        }
        ConfigCommands::Show { json } => {
            output.print(render(&config, json)?.trim_end())?;
        }
    }
    Ok(())
}

fn render(config: &AppConfig, json: bool) -> CliResult<String> {
    if json {
        serde_json::to_string_pretty(config).map_err(|e| CliError::Config {
            message: format!("Failed to serialise config: {e}"),
            source: Some(Box::new(e)),
        })
    } else {
        config
            .to_toml()
            .with_cli_context(|| "Failed to serialise config")
    }
}
