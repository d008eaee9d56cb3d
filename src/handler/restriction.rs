//! Restriction gate
//!
//! A handler carrying restrictions only runs on documents where at least one
//! restriction matches. Each restriction is a whole-match regex tested against
//! every value of one metadata field.

use crate::doc::Metadata;
use crate::error::Result;
use crate::text::pattern::{CachedRegex, MatchMode};
use serde::{Deserialize, Serialize};

/// Declarative form of a [`Restriction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RestrictionConfig {
    pub field: String,
    pub pattern: String,
    #[serde(default)]
    pub case_sensitive: bool,
}

impl RestrictionConfig {
    pub fn new(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            pattern: pattern.into(),
            case_sensitive: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Restriction {
    field: String,
    regex: CachedRegex,
}

impl Restriction {
    pub fn new(config: &RestrictionConfig) -> Result<Self> {
        Ok(Self {
            field: config.field.clone(),
            regex: CachedRegex::compiled(&config.pattern, config.case_sensitive, MatchMode::Whole)?,
        })
    }

    pub fn matches(&self, metadata: &Metadata) -> Result<bool> {
        for value in metadata.get(&self.field) {
            if self.regex.is_match(value)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// The restrictions of one handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Restrictions(Vec<Restriction>);

impl Restrictions {
    pub fn new(configs: &[RestrictionConfig]) -> Result<Self> {
        configs
            .iter()
            .map(Restriction::new)
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no restrictions or any of them matches.
    pub fn is_applicable(&self, metadata: &Metadata) -> Result<bool> {
        if self.0.is_empty() {
            return Ok(true);
        }
        for restriction in &self.0 {
            if restriction.matches(metadata)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
