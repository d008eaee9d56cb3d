//! Reduce multi-valued fields to a single value

use crate::error::Result;
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::fields::{FieldMatcher, FieldMatcherConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SingleValueAction {
    #[default]
    KeepFirst,
    KeepLast,
    /// Join every value with the separator.
    Merge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ForceSingleValueTaggerConfig {
    #[serde(default)]
    pub action: SingleValueAction,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub separator: String,
    pub field_matcher: FieldMatcherConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

#[derive(Debug)]
pub struct ForceSingleValueTagger {
    config: ForceSingleValueTaggerConfig,
    matcher: FieldMatcher,
    restrictions: Restrictions,
}

impl ForceSingleValueTagger {
    pub fn new(config: ForceSingleValueTaggerConfig) -> Result<Self> {
        Ok(Self {
            matcher: FieldMatcher::required("ForceSingleValueTagger", &config.field_matcher)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &ForceSingleValueTaggerConfig {
        &self.config
    }

    fn single(&self, values: &[String]) -> Option<String> {
        match self.config.action {
            SingleValueAction::KeepFirst => values.first().cloned(),
            SingleValueAction::KeepLast => values.last().cloned(),
            SingleValueAction::Merge => Some(values.join(&self.config.separator)),
        }
    }
}

impl DocumentTagger for ForceSingleValueTagger {
    fn name(&self) -> &'static str {
        "ForceSingleValueTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        for field in self.matcher.resolve(doc.metadata)? {
            let values = doc.metadata.get(&field);
            if values.len() < 2 {
                continue;
            }
            if let Some(value) = self.single(values) {
                doc.metadata.set(&field, value);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_round_trip, meta, tag};

    fn tagger(action: SingleValueAction, separator: &str) -> ForceSingleValueTagger {
        ForceSingleValueTagger::new(ForceSingleValueTaggerConfig {
            action,
            separator: separator.to_string(),
            field_matcher: FieldMatcherConfig::names(["keywords"]),
            restrictions: Vec::new(),
        })
        .unwrap()
    }

    fn sample() -> crate::doc::Metadata {
        meta(&[("keywords", "rust"), ("keywords", "text"), ("keywords", "regex"), ("title", "t")])
    }

    #[test]
    fn test_keep_first_and_last() {
        let mut metadata = sample();
        tag(&tagger(SingleValueAction::KeepFirst, ""), "", &mut metadata);
        assert_eq!(metadata.get("keywords"), ["rust"]);

        let mut metadata = sample();
        tag(&tagger(SingleValueAction::KeepLast, ""), "", &mut metadata);
        assert_eq!(metadata.get("keywords"), ["regex"]);
        assert_eq!(metadata.field_names().collect::<Vec<_>>(), ["keywords", "title"]);
    }

    #[test]
    fn test_merge_with_separator() {
        let mut metadata = sample();
        tag(&tagger(SingleValueAction::Merge, ", "), "", &mut metadata);
        assert_eq!(metadata.get("keywords"), ["rust, text, regex"]);
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(tagger(SingleValueAction::Merge, "|").config());
    }
}
