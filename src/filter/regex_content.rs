//! Filter on document content

use crate::error::Result;
use crate::handler::{DocumentFilter, HandlerDoc, OnMatch, RestrictionConfig, Restrictions};
use crate::text::pattern::{CachedRegex, MatchMode};
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, for_each_text_section};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

fn default_max_read_size() -> usize {
    DEFAULT_MAX_READ_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegexContentFilterConfig {
    /// Regex searched for anywhere in the content.
    pub pattern: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub on_match: OnMatch,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl RegexContentFilterConfig {
    pub fn new(pattern: impl Into<String>, on_match: OnMatch) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive: false,
            on_match,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Matches when the pattern is found in any section of the content.
///
/// Content is read section by section, so a match spanning two sections is
/// not seen.
#[derive(Debug)]
pub struct RegexContentFilter {
    config: RegexContentFilterConfig,
    regex: CachedRegex,
    restrictions: Restrictions,
}

impl RegexContentFilter {
    pub fn new(config: RegexContentFilterConfig) -> Result<Self> {
        Ok(Self {
            regex: CachedRegex::compiled(&config.pattern, config.case_sensitive, MatchMode::Find)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &RegexContentFilterConfig {
        &self.config
    }
}

impl DocumentFilter for RegexContentFilter {
    fn name(&self) -> &'static str {
        "RegexContentFilter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn on_match(&self) -> OnMatch {
        self.config.on_match
    }

    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        let regex = self.regex.regex()?;
        let mut matched = false;
        for_each_text_section(self.name(), doc.reference, doc.content, self.config.max_read_size, |section, _| {
            if regex.is_match(section) {
                matched = true;
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(matched)
    }
}
