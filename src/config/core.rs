use super::ImporterConfig;
use anyhow::{Context, Result};
use clap::ValueEnum;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
};
use std::path::{Path, PathBuf};

/// Prefix of environment variables overriding configuration values.
pub const CONFIG_ENV_PREFIX: &str = "DOCSIFT_";

/// File names looked up in the working directory when no file is given.
const DEFAULT_CONFIG_FILES: &[&str] = &["docsift.toml", "docsift.json", "docsift.yaml", "docsift.yml"];

/// Serialization formats a configuration can be read from or written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Format implied by a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

impl ImporterConfig {
    /// Load from the default file names in the working directory, if any.
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    /// Load defaults, then the given (or discovered) file, then `DOCSIFT_*`
    /// environment variables.
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(custom_config)?;
        let config: ImporterConfig = figment.extract().context("Failed to parse configuration")?;
        tracing::debug!(
            "Loaded configuration with {} pre-parse and {} post-parse handlers",
            config.pre_parse_handlers.len(),
            config.post_parse_handlers.len()
        );
        Ok(config)
    }

    /// The layered configuration sources, lowest priority first.
    pub fn figment(custom_config: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ImporterConfig::default()));

        let path = match custom_config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file not found: {}", path.display());
                }
                Some(path.to_path_buf())
            }
            None => DEFAULT_CONFIG_FILES
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists()),
        };

        if let Some(path) = path {
            tracing::info!("Using configuration file {}", path.display());
            figment = match ConfigFormat::from_path(&path) {
                Some(ConfigFormat::Toml) => figment.merge(Toml::file(&path)),
                Some(ConfigFormat::Json) => figment.merge(Json::file(&path)),
                Some(ConfigFormat::Yaml) => figment.merge(Yaml::file(&path)),
                None => anyhow::bail!(
                    "Unsupported configuration file extension: {} (expected .toml, .json, .yaml or .yml)",
                    path.display()
                ),
            };
        }

        // Environment variables always have highest priority
        Ok(figment.merge(Env::prefixed(CONFIG_ENV_PREFIX).map(|key| key.as_str().replace('_', "-").into())))
    }

    /// Render in the given format.
    pub fn to_format(&self, format: ConfigFormat) -> Result<String> {
        let text = match format {
            ConfigFormat::Toml => toml::to_string_pretty(self).context("Failed to serialize configuration as TOML")?,
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).context("Failed to serialize configuration as JSON")?
            }
            ConfigFormat::Yaml => serde_yml::to_string(self).context("Failed to serialize configuration as YAML")?,
        };
        Ok(text)
    }
}
