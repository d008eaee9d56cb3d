//! Extract text found between two patterns

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
pub struct TextBetweenTaggerConfig {
    pub to_field: String,
    pub start: String,
    pub end: String,
    /// Keep the start and end matches in the extracted text.
    #[serde(default)]
    pub inclusive: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl TextBetweenTaggerConfig {
    pub fn new(to_field: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            to_field: to_field.into(),
            start: start.into(),
            end: end.into(),
            inclusive: false,
            case_sensitive: false,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Adds the text of every start..end span of the content to a field.
///
/// A span must open and close within one section.
#[derive(Debug)]
pub struct TextBetweenTagger {
    config: TextBetweenTaggerConfig,
    start: Regex,
    end: Regex,
    restrictions: Restrictions,
}

impl TextBetweenTagger {
    pub fn new(config: TextBetweenTaggerConfig) -> Result<Self> {
        if config.start.is_empty() || config.end.is_empty() {
            return Err(ImporterError::config("TextBetweenTagger", "`start` and `end` are required"));
        }
        Ok(Self {
            start: compile(&config.start, config.case_sensitive, MatchMode::Find)?,
            end: compile(&config.end, config.case_sensitive, MatchMode::Find)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &TextBetweenTaggerConfig {
        &self.config
    }

    fn extract(&self, section: &str, found: &mut Vec<String>) {
        let mut offset = 0;
        while let Some(start) = self.start.find_at(section, offset) {
            let Some(end) = self.end.find_at(section, start.end()) else {
                break;
            };
            let span = if self.config.inclusive {
                &section[start.start()..end.end()]
            } else {
                &section[start.end()..end.start()]
            };
            found.push(span.to_string());
            // Guard against empty matches looping in place.
            offset = end.end().max(start.start() + 1);
            if offset > section.len() {
                break;
            }
            while !section.is_char_boundary(offset) {
                offset += 1;
            }
        }
    }
}

impl DocumentTagger for TextBetweenTagger {
    fn name(&self) -> &'static str {
        "TextBetweenTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let mut found = Vec::new();
        for_each_text_section(self.name(), doc.reference, doc.content, self.config.max_read_size, |section, _| {
            self.extract(section, &mut found);
            Ok(ControlFlow::Continue(()))
        })?;
        if !found.is_empty() {
            doc.metadata.add_all(&self.config.to_field, found);
        }
        Ok(())
    }
}
