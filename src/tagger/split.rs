//! Split field values on a separator

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::pattern::{MatchMode, compile, literal};
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SplitTaggerConfig {
    pub from_field: String,
    /// Split values are written here, leaving `from_field` alone. When absent
    /// the values of `from_field` are replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field: Option<String>,
    pub separator: String,
    #[serde(default)]
    pub separator_regex: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Splits each value of a field into several values. Parts are trimmed and
/// blank parts are dropped.
#[derive(Debug)]
pub struct SplitTagger {
    config: SplitTaggerConfig,
    separator: Regex,
    restrictions: Restrictions,
}

impl SplitTagger {
    pub fn new(config: SplitTaggerConfig) -> Result<Self> {
        if config.separator.is_empty() {
            return Err(ImporterError::config("SplitTagger", "`separator` cannot be empty"));
        }
        let pattern = if config.separator_regex {
            config.separator.clone()
        } else {
            literal(&config.separator)
        };
        Ok(Self {
            separator: compile(&pattern, true, MatchMode::Find)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &SplitTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for SplitTagger {
    fn name(&self) -> &'static str {
        "SplitTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        if !doc.metadata.contains(&self.config.from_field) {
            return Ok(());
        }
        let parts: Vec<String> = doc
            .metadata
            .get(&self.config.from_field)
            .iter()
            .flat_map(|value| self.separator.split(value))
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
        match self.config.to_field.as_deref() {
            Some(to) if to != self.config.from_field => doc.metadata.add_all(to, parts),
            _ => doc.metadata.set_all(&self.config.from_field, parts),
        }
        Ok(())
    }
}
