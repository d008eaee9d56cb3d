//! Change the character case of field values and names

use crate::error::Result;
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::case::CharacterCase;
use crate::text::fields::{FieldMatcher, FieldMatcherConfig};
use serde::{Deserialize, Serialize};

/// Which part of a field the case change applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyTo {
    #[default]
    Value,
    Field,
    Both,
}

impl ApplyTo {
    fn values(self) -> bool {
        matches!(self, ApplyTo::Value | ApplyTo::Both)
    }

    fn field(self) -> bool {
        matches!(self, ApplyTo::Field | ApplyTo::Both)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CharacterCaseTaggerConfig {
    pub case: CharacterCase,
    #[serde(default)]
    pub apply_to: ApplyTo,
    pub field_matcher: FieldMatcherConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Changes the case of field values, field names, or both. A renamed field
/// is merged into an existing field of the same name.
#[derive(Debug)]
pub struct CharacterCaseTagger {
    config: CharacterCaseTaggerConfig,
    matcher: FieldMatcher,
    restrictions: Restrictions,
}

impl CharacterCaseTagger {
    pub fn new(config: CharacterCaseTaggerConfig) -> Result<Self> {
        Ok(Self {
            matcher: FieldMatcher::required("CharacterCaseTagger", &config.field_matcher)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &CharacterCaseTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for CharacterCaseTagger {
    fn name(&self) -> &'static str {
        "CharacterCaseTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let case = self.config.case;
        for field in self.matcher.resolve(doc.metadata)? {
            if self.config.apply_to.values() {
                let values: Vec<String> = doc.metadata.get(&field).iter().map(|v| case.apply(v)).collect();
                doc.metadata.set_all(&field, values);
            }
            if self.config.apply_to.field() {
                let renamed = case.apply(&field);
                doc.metadata.rename(&field, &renamed, false);
            }
        }
        Ok(())
    }
}
