//! Filters on empty or missing metadata fields
//!
//! The two filters differ on purpose: [`EmptyMetadataFilter`] names fields
//! literally and treats an absent field as empty, [`EmptyFilter`] resolves a
//! field matcher and treats "no field matched" as empty. A value made only of
//! whitespace or control characters counts as empty for both.

use crate::doc::Metadata;
use crate::error::Result;
use crate::handler::{DocumentFilter, HandlerDoc, OnMatch, RestrictionConfig, Restrictions};
use crate::text::fields::{FieldMatcher, FieldMatcherConfig};
use crate::text::is_blank;
use serde::{Deserialize, Serialize};

fn is_field_empty(metadata: &Metadata, field: &str) -> bool {
    metadata.get(field).iter().all(|v| is_blank(v))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EmptyMetadataFilterConfig {
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub on_match: OnMatch,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Matches when any listed field is absent or blank, or when no field is listed.
#[derive(Debug)]
pub struct EmptyMetadataFilter {
    config: EmptyMetadataFilterConfig,
    restrictions: Restrictions,
}

impl EmptyMetadataFilter {
    pub fn new(config: EmptyMetadataFilterConfig) -> Result<Self> {
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &EmptyMetadataFilterConfig {
        &self.config
    }
}

impl DocumentFilter for EmptyMetadataFilter {
    fn name(&self) -> &'static str {
        "EmptyMetadataFilter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn on_match(&self) -> OnMatch {
        self.config.on_match
    }

    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        if self.config.fields.is_empty() {
            return Ok(true);
        }
        Ok(self
            .config
            .fields
            .iter()
            .any(|field| is_field_empty(doc.metadata, field)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EmptyFilterConfig {
    #[serde(default)]
    pub on_match: OnMatch,
    #[serde(default)]
    pub field_matcher: FieldMatcherConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Matches when the matcher resolves no field, or when any resolved field is blank.
#[derive(Debug)]
pub struct EmptyFilter {
    config: EmptyFilterConfig,
    matcher: FieldMatcher,
    restrictions: Restrictions,
}

impl EmptyFilter {
    pub fn new(config: EmptyFilterConfig) -> Result<Self> {
        Ok(Self {
            matcher: FieldMatcher::new(&config.field_matcher)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &EmptyFilterConfig {
        &self.config
    }
}

impl DocumentFilter for EmptyFilter {
    fn name(&self) -> &'static str {
        "EmptyFilter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn on_match(&self) -> OnMatch {
        self.config.on_match
    }

    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        if self.matcher.is_empty() {
            return Ok(true);
        }
        let fields = self.matcher.resolve(doc.metadata)?;
        if fields.is_empty() {
            return Ok(true);
        }
        Ok(fields.iter().any(|field| is_field_empty(doc.metadata, field)))
    }
}
