//! Tag documents with constant values

use crate::error::Result;
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::tagger::OnConflict;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConstantTaggerConfig {
    #[serde(default)]
    pub on_conflict: OnConflict,
    /// Field name to the values it receives, applied in order.
    pub constants: IndexMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

#[derive(Debug)]
pub struct ConstantTagger {
    config: ConstantTaggerConfig,
    restrictions: Restrictions,
}

impl ConstantTagger {
    pub fn new(config: ConstantTaggerConfig) -> Result<Self> {
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &ConstantTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for ConstantTagger {
    fn name(&self) -> &'static str {
        "ConstantTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        for (field, values) in &self.config.constants {
            self.config.on_conflict.store(doc.metadata, field, values.iter().cloned());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_round_trip, meta, tag};

    fn tagger(on_conflict: OnConflict) -> ConstantTagger {
        let mut constants = IndexMap::new();
        constants.insert("source".to_string(), vec!["crawler".to_string(), "docs".to_string()]);
        ConstantTagger::new(ConstantTaggerConfig {
            on_conflict,
            constants,
            restrictions: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_adds_constants() {
        let mut metadata = meta(&[("source", "web")]);
        tag(&tagger(OnConflict::Add), "", &mut metadata);
        assert_eq!(metadata.get("source"), ["web", "crawler", "docs"]);
    }

    #[test]
    fn test_replace_and_noop() {
        let mut metadata = meta(&[("source", "web")]);
        tag(&tagger(OnConflict::Noop), "", &mut metadata);
        assert_eq!(metadata.get("source"), ["web"]);

        tag(&tagger(OnConflict::Replace), "", &mut metadata);
        assert_eq!(metadata.get("source"), ["crawler", "docs"]);
    }

    #[test]
    fn test_restricted_tagger_leaves_metadata_alone() {
        let mut config = tagger(OnConflict::Add).config().clone();
        config.restrictions.push(RestrictionConfig::new("type", "text/html"));
        let tagger = ConstantTagger::new(config).unwrap();

        let mut metadata = meta(&[("type", "application/pdf")]);
        tag(&tagger, "", &mut metadata);
        assert!(!metadata.contains("source"));

        let mut metadata = meta(&[("type", "text/html")]);
        tag(&tagger, "", &mut metadata);
        assert_eq!(metadata.get("source"), ["crawler", "docs"]);
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(tagger(OnConflict::Replace).config());
    }
}
