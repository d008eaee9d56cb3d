use crate::cli::Output;
use crate::config::{ConfigFormat, ImporterConfig};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::Path;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Check that every configured handler builds
    Validate,
    /// Display the merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
    },
}

pub fn execute(args: ConfigArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = ImporterConfig::load_with_custom_config(custom_config)?;

    match args.command {
        ConfigCommand::Validate => {
            output.info(&format!("Validating {} handlers...", config.handler_count()));
            config.validate().context("Configuration is invalid")?;
            output.success("Configuration is valid!");
        }
        ConfigCommand::Show { format } => {
            print!("{}", config.to_format(format)?);
        }
    }

    Ok(())
}
