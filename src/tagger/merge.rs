//! Merge several fields into one

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::fields::{FieldMatcher, FieldMatcherConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MergeTaggerConfig {
    pub to_field: String,
    #[serde(default)]
    pub delete_from_fields: bool,
    /// Join the merged values into one.
    #[serde(default)]
    pub single_value: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub single_value_separator: String,
    pub field_matcher: FieldMatcherConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Collects the values of every resolved field, in metadata order, into
/// `to_field`.
#[derive(Debug)]
pub struct MergeTagger {
    config: MergeTaggerConfig,
    matcher: FieldMatcher,
    restrictions: Restrictions,
}

impl MergeTagger {
    pub fn new(config: MergeTaggerConfig) -> Result<Self> {
        if config.to_field.trim().is_empty() {
            return Err(ImporterError::config("MergeTagger", "`to-field` cannot be blank"));
        }
        Ok(Self {
            matcher: FieldMatcher::required("MergeTagger", &config.field_matcher)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &MergeTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for MergeTagger {
    fn name(&self) -> &'static str {
        "MergeTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let sources = self.matcher.resolve(doc.metadata)?;
        if sources.is_empty() {
            return Ok(());
        }
        let mut merged: Vec<String> = sources
            .iter()
            .flat_map(|field| doc.metadata.get(field).iter().cloned())
            .collect();
        if self.config.delete_from_fields {
            for field in &sources {
                doc.metadata.remove(field);
            }
        }
        if self.config.single_value {
            merged = vec![merged.join(&self.config.single_value_separator)];
        }

        let to = &self.config.to_field;
        // The target already contributed its own values to the merge.
        if sources.contains(to) {
            doc.metadata.set_all(to, merged);
        } else {
            doc.metadata.add_all(to, merged);
        }
        Ok(())
    }
}
