//! Taggers moving, copying and removing whole fields

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::tagger::store;
use crate::text::fields::{FieldMatcher, FieldMatcherConfig};
use serde::{Deserialize, Serialize};

fn require_field(handler: &'static str, what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ImporterError::config(handler, format!("`{what}` cannot be blank")));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CopyTaggerConfig {
    pub from: String,
    pub to: String,
    /// Replace the values of `to` instead of appending to them.
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Copies the values of one field to another.
#[derive(Debug)]
pub struct CopyTagger {
    config: CopyTaggerConfig,
    restrictions: Restrictions,
}

impl CopyTagger {
    pub fn new(config: CopyTaggerConfig) -> Result<Self> {
        require_field("CopyTagger", "from", &config.from)?;
        require_field("CopyTagger", "to", &config.to)?;
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &CopyTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for CopyTagger {
    fn name(&self) -> &'static str {
        "CopyTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        if !doc.metadata.contains(&self.config.from) {
            return Ok(());
        }
        let values = doc.metadata.get(&self.config.from).to_vec();
        store(doc.metadata, &self.config.to, values, self.config.overwrite);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RenameTaggerConfig {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Renames a field, merging into the target when it exists and
/// `overwrite` is off.
#[derive(Debug)]
pub struct RenameTagger {
    config: RenameTaggerConfig,
    restrictions: Restrictions,
}

impl RenameTagger {
    pub fn new(config: RenameTaggerConfig) -> Result<Self> {
        require_field("RenameTagger", "from", &config.from)?;
        require_field("RenameTagger", "to", &config.to)?;
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &RenameTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for RenameTagger {
    fn name(&self) -> &'static str {
        "RenameTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        doc.metadata
            .rename(&self.config.from, &self.config.to, self.config.overwrite);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeleteTaggerConfig {
    pub field_matcher: FieldMatcherConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Removes every field the matcher resolves.
#[derive(Debug)]
pub struct DeleteTagger {
    config: DeleteTaggerConfig,
    matcher: FieldMatcher,
    restrictions: Restrictions,
}

impl DeleteTagger {
    pub fn new(config: DeleteTaggerConfig) -> Result<Self> {
        Ok(Self {
            matcher: FieldMatcher::required("DeleteTagger", &config.field_matcher)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &DeleteTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for DeleteTagger {
    fn name(&self) -> &'static str {
        "DeleteTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        for field in self.matcher.resolve(doc.metadata)? {
            doc.metadata.remove(&field);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct KeepOnlyTaggerConfig {
    pub field_matcher: FieldMatcherConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Removes every field the matcher does not resolve.
#[derive(Debug)]
pub struct KeepOnlyTagger {
    config: KeepOnlyTaggerConfig,
    matcher: FieldMatcher,
    restrictions: Restrictions,
}

impl KeepOnlyTagger {
    pub fn new(config: KeepOnlyTaggerConfig) -> Result<Self> {
        Ok(Self {
            matcher: FieldMatcher::required("KeepOnlyTagger", &config.field_matcher)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &KeepOnlyTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for KeepOnlyTagger {
    fn name(&self) -> &'static str {
        "KeepOnlyTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let keep = self.matcher.resolve(doc.metadata)?;
        doc.metadata.retain(|field, _| keep.iter().any(|k| k == field));
        Ok(())
    }
}
