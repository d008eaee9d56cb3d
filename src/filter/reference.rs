//! Filter on the document reference

use crate::error::Result;
use crate::handler::{DocumentFilter, HandlerDoc, OnMatch, RestrictionConfig, Restrictions};
use crate::text::pattern::{CachedRegex, MatchMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReferenceFilterConfig {
    /// Regex the whole reference must match.
    pub pattern: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub on_match: OnMatch,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl ReferenceFilterConfig {
    pub fn new(pattern: impl Into<String>, on_match: OnMatch) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive: false,
            on_match,
            restrictions: Vec::new(),
        }
    }
}

/// Accepts or rejects documents based on their reference.
#[derive(Debug)]
pub struct ReferenceFilter {
    config: ReferenceFilterConfig,
    regex: CachedRegex,
    restrictions: Restrictions,
}

impl ReferenceFilter {
    pub fn new(config: ReferenceFilterConfig) -> Result<Self> {
        Ok(Self {
            regex: CachedRegex::compiled(&config.pattern, config.case_sensitive, MatchMode::Whole)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &ReferenceFilterConfig {
        &self.config
    }
}

impl DocumentFilter for ReferenceFilter {
    fn name(&self) -> &'static str {
        "ReferenceFilter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn on_match(&self) -> OnMatch {
        self.config.on_match
    }

    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        self.regex.is_match(doc.reference)
    }
}
