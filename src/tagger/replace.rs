//! Replace text in field values

use crate::error::Result;
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::replace::{ReplaceConfig, Replacer};
use serde::{Deserialize, Serialize};

/// One replacement applied to the values of `field`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FieldReplaceConfig {
    pub field: String,
    /// Results are added here instead of replacing the values of `field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field: Option<String>,
    pub replace: ReplaceConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReplaceTaggerConfig {
    pub replacements: Vec<FieldReplaceConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

#[derive(Debug)]
pub struct ReplaceTagger {
    config: ReplaceTaggerConfig,
    replacers: Vec<Replacer>,
    restrictions: Restrictions,
}

impl ReplaceTagger {
    pub fn new(config: ReplaceTaggerConfig) -> Result<Self> {
        let replacers = config
            .replacements
            .iter()
            .map(|r| Replacer::new(&r.replace))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            replacers,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &ReplaceTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for ReplaceTagger {
    fn name(&self) -> &'static str {
        "ReplaceTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        for (replacement, replacer) in self.config.replacements.iter().zip(&self.replacers) {
            if !doc.metadata.contains(&replacement.field) {
                continue;
            }
            let values: Vec<String> = doc
                .metadata
                .get(&replacement.field)
                .iter()
                .map(|v| replacer.apply(v).into_owned())
                .collect();
            match &replacement.to_field {
                Some(to) => doc.metadata.add_all(to, values),
                None => doc.metadata.set_all(&replacement.field, values),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_round_trip, meta, tag};

    fn tagger(replacements: Vec<FieldReplaceConfig>) -> ReplaceTagger {
        ReplaceTagger::new(ReplaceTaggerConfig {
            replacements,
            restrictions: Vec::new(),
        })
        .unwrap()
    }

    #[test]
    fn test_replacements_apply_in_order() {
        let tagger = tagger(vec![
            FieldReplaceConfig {
                field: "title".to_string(),
                to_field: None,
                replace: ReplaceConfig::literal("colour", "color"),
            },
            FieldReplaceConfig {
                field: "title".to_string(),
                to_field: None,
                replace: ReplaceConfig::regex(r"\s+", " "),
            },
        ]);
        let mut metadata = meta(&[("title", "Colour   of\tcolour")]);
        tag(&tagger, "", &mut metadata);
        assert_eq!(metadata.get("title"), ["color of color"]);
    }

    #[test]
    fn test_replace_into_other_field() {
        let tagger = tagger(vec![FieldReplaceConfig {
            field: "email".to_string(),
            to_field: Some("domain".to_string()),
            replace: ReplaceConfig::regex(r".*@(.*)", "$1"),
        }]);
        let mut metadata = meta(&[("email", "ann@example.com")]);
        tag(&tagger, "", &mut metadata);
        assert_eq!(metadata.get("domain"), ["example.com"]);
        assert_eq!(metadata.get("email"), ["ann@example.com"]);
    }

    #[test]
    fn test_invalid_regex_fails_fast() {
        let config = ReplaceTaggerConfig {
            replacements: vec![FieldReplaceConfig {
                field: "x".to_string(),
                to_field: None,
                replace: ReplaceConfig::regex("(", ""),
            }],
            restrictions: Vec::new(),
        };
        assert!(ReplaceTagger::new(config).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(&ReplaceTaggerConfig {
            replacements: vec![FieldReplaceConfig {
                field: "title".to_string(),
                to_field: Some("clean".to_string()),
                replace: ReplaceConfig::literal("&amp;", "&"),
            }],
            restrictions: Vec::new(),
        });
    }
}
