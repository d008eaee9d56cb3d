//! Detect the language of the content

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::tagger::store;
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, for_each_text_section};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;
use whatlang::{Detector, Lang};

fn default_to_field() -> String {
    "document.language".to_string()
}

fn default_max_read_size() -> usize {
    DEFAULT_MAX_READ_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LanguageTaggerConfig {
    #[serde(default = "default_to_field")]
    pub to_field: String,
    /// ISO 639-3 codes of the candidate languages; empty means any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    /// Stored when no candidate language can be detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_language: Option<String>,
    /// Also store the detection confidence in `<to-field>.confidence`.
    #[serde(default)]
    pub keep_confidence: bool,
    #[serde(default)]
    pub overwrite: bool,
    /// Characters of content sampled for detection.
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl Default for LanguageTaggerConfig {
    fn default() -> Self {
        Self {
            to_field: default_to_field(),
            languages: Vec::new(),
            fallback_language: None,
            keep_confidence: false,
            overwrite: false,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Stores the ISO 639-3 code of the language a sample of the content is
/// written in.
#[derive(Debug)]
pub struct LanguageTagger {
    config: LanguageTaggerConfig,
    candidates: Vec<Lang>,
    restrictions: Restrictions,
}

impl LanguageTagger {
    pub fn new(config: LanguageTaggerConfig) -> Result<Self> {
        if config.to_field.is_empty() {
            return Err(ImporterError::config("LanguageTagger", "to-field must not be empty"));
        }
        if config.max_read_size == 0 {
            return Err(ImporterError::config("LanguageTagger", "max-read-size must be positive"));
        }
        let candidates = config
            .languages
            .iter()
            .map(|code| {
                Lang::from_code(&code.trim().to_lowercase())
                    .ok_or_else(|| ImporterError::config("LanguageTagger", format!("unknown language code `{code}`")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            candidates,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &LanguageTaggerConfig {
        &self.config
    }

    fn detector(&self) -> Detector {
        if self.candidates.is_empty() {
            Detector::new()
        } else {
            Detector::with_allowlist(self.candidates.clone())
        }
    }
}

impl DocumentTagger for LanguageTagger {
    fn name(&self) -> &'static str {
        "LanguageTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let limit = self.config.max_read_size;
        let mut sample = String::new();
        for_each_text_section(self.name(), doc.reference, doc.content, limit, |section, _| {
            sample.push_str(section);
            if sample.chars().count() >= limit {
                Ok(ControlFlow::Break(()))
            } else {
                Ok(ControlFlow::Continue(()))
            }
        })?;

        let field = &self.config.to_field;
        match self.detector().detect(&sample) {
            Some(info) => {
                tracing::debug!(
                    "Detected {} in {} (confidence {:.2})",
                    info.lang().code(),
                    doc.reference,
                    info.confidence()
                );
                store(doc.metadata, field, vec![info.lang().code().to_string()], self.config.overwrite);
                if self.config.keep_confidence {
                    let confidence = format!("{:.4}", info.confidence());
                    store(doc.metadata, &format!("{field}.confidence"), vec![confidence], self.config.overwrite);
                }
            }
            None => match &self.config.fallback_language {
                Some(fallback) => store(doc.metadata, field, vec![fallback.clone()], self.config.overwrite),
                None => tracing::debug!("No language detected in {}", doc.reference),
            },
        }
        Ok(())
    }
}
