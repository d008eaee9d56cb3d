//! Extract regex matches from content into a field

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::pattern::{MatchMode, compile};
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, for_each_text_section};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

fn default_max_read_size() -> usize {
    DEFAULT_MAX_READ_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextPatternTaggerConfig {
    pub to_field: String,
    pub pattern: String,
    /// Capture group to store; 0 stores the whole match.
    #[serde(default)]
    pub group: usize,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl TextPatternTaggerConfig {
    pub fn new(to_field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            to_field: to_field.into(),
            pattern: pattern.into(),
            group: 0,
            case_sensitive: false,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Adds every match of a pattern found in the content to a field.
#[derive(Debug)]
pub struct TextPatternTagger {
    config: TextPatternTaggerConfig,
    regex: Regex,
    restrictions: Restrictions,
}

impl TextPatternTagger {
    pub fn new(config: TextPatternTaggerConfig) -> Result<Self> {
        let regex = compile(&config.pattern, config.case_sensitive, MatchMode::Find)?;
        if config.group >= regex.captures_len() {
            return Err(ImporterError::config(
                "TextPatternTagger",
                format!("pattern `{}` has no group {}", config.pattern, config.group),
            ));
        }
        Ok(Self {
            regex,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &TextPatternTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for TextPatternTagger {
    fn name(&self) -> &'static str {
        "TextPatternTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let mut found = Vec::new();
        for_each_text_section(self.name(), doc.reference, doc.content, self.config.max_read_size, |section, _| {
            found.extend(
                self.regex
                    .captures_iter(section)
                    .filter_map(|caps| caps.get(self.config.group))
                    .map(|m| m.as_str().to_string()),
            );
            Ok(ControlFlow::Continue(()))
        })?;
        if !found.is_empty() {
            doc.metadata.add_all(&self.config.to_field, found);
        }
        Ok(())
    }
}
