//! Change the character case of content

use crate::error::Result;
use crate::handler::{DocumentTransformer, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::case::{CaseState, CharacterCase};
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, transform_text_sections};
use crate::transformer::default_max_read_size;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CharacterCaseTransformerConfig {
    pub case: CharacterCase,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl CharacterCaseTransformerConfig {
    pub fn new(case: CharacterCase) -> Self {
        Self {
            case,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct CharacterCaseTransformer {
    config: CharacterCaseTransformerConfig,
    restrictions: Restrictions,
}

impl CharacterCaseTransformer {
    pub fn new(config: CharacterCaseTransformerConfig) -> Result<Self> {
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &CharacterCaseTransformerConfig {
        &self.config
    }
}

impl DocumentTransformer for CharacterCaseTransformer {
    fn name(&self) -> &'static str {
        "CharacterCaseTransformer"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn transform_applicable_document(&self, doc: &mut HandlerDoc<'_>, output: &mut dyn Write) -> Result<()> {
        let case = self.config.case;
        let mut state = CaseState::default();
        transform_text_sections(
            self.name(),
            doc.reference,
            doc.content,
            output,
            self.config.max_read_size,
            |section, _| {
                *section = case.apply_continued(section, &mut state);
                Ok(())
            },
        )
    }
}
