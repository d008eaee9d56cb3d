//! Replace text in content

use crate::error::Result;
use crate::handler::{DocumentTransformer, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, transform_text_sections};
use crate::text::replace::{ReplaceConfig, Replacer};
use crate::transformer::default_max_read_size;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReplaceTransformerConfig {
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    pub replacements: Vec<ReplaceConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl ReplaceTransformerConfig {
    pub fn new(replacements: Vec<ReplaceConfig>) -> Self {
        Self {
            max_read_size: DEFAULT_MAX_READ_SIZE,
            replacements,
            restrictions: Vec::new(),
        }
    }
}

/// Applies each replacement in order to every content section.
#[derive(Debug)]
pub struct ReplaceTransformer {
    config: ReplaceTransformerConfig,
    replacers: Vec<Replacer>,
    restrictions: Restrictions,
}

impl ReplaceTransformer {
    pub fn new(config: ReplaceTransformerConfig) -> Result<Self> {
        let replacers = config
            .replacements
            .iter()
            .map(Replacer::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            replacers,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &ReplaceTransformerConfig {
        &self.config
    }
}

impl DocumentTransformer for ReplaceTransformer {
    fn name(&self) -> &'static str {
        "ReplaceTransformer"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn transform_applicable_document(&self, doc: &mut HandlerDoc<'_>, output: &mut dyn Write) -> Result<()> {
        transform_text_sections(
            self.name(),
            doc.reference,
            doc.content,
            output,
            self.config.max_read_size,
            |section, _| {
                for replacer in &self.replacers {
                    let replaced = match replacer.apply(section) {
                        Cow::Owned(replaced) => replaced,
                        Cow::Borrowed(_) => continue,
                    };
                    *section = replaced;
                }
                Ok(())
            },
        )
    }
}
