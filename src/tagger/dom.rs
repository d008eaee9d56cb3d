//! Extract values from HTML with CSS selectors

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::tagger::store;
use crate::text::dom::{Extract, parse_selector, select_values};
use scraper::Selector;
use serde::{Deserialize, Serialize};

fn default_extract() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DomTaggerConfig {
    pub selector: String,
    pub to_field: String,
    #[serde(default = "default_extract")]
    pub extract: String,
    /// Parse the values of this field instead of the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_field: Option<String>,
    #[serde(default)]
    pub overwrite: bool,
    /// Skip blank extracted values.
    #[serde(default)]
    pub skip_blanks: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl DomTaggerConfig {
    pub fn new(selector: impl Into<String>, to_field: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            to_field: to_field.into(),
            extract: default_extract(),
            from_field: None,
            overwrite: false,
            skip_blanks: false,
            restrictions: Vec::new(),
        }
    }
}

/// Stores what a CSS selector extracts from the content (or from a field)
/// in a field.
#[derive(Debug)]
pub struct DomTagger {
    config: DomTaggerConfig,
    selector: Selector,
    extract: Extract,
    restrictions: Restrictions,
}

impl DomTagger {
    pub fn new(config: DomTaggerConfig) -> Result<Self> {
        if config.to_field.trim().is_empty() {
            return Err(ImporterError::config("DomTagger", "`to-field` cannot be blank"));
        }
        Ok(Self {
            selector: parse_selector(&config.selector)?,
            extract: Extract::parse_for("DomTagger", &config.extract)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &DomTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for DomTagger {
    fn name(&self) -> &'static str {
        "DomTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let sources = match &self.config.from_field {
            Some(field) => doc.metadata.get(field).to_vec(),
            None => vec![doc.read_text(self.name())?],
        };
        let mut values: Vec<String> = sources
            .iter()
            .flat_map(|html| select_values(html, &self.selector, &self.extract))
            .collect();
        if self.config.skip_blanks {
            values.retain(|v| !v.trim().is_empty());
        }
        if values.is_empty() {
            tracing::debug!("{} found nothing for `{}` in {}", self.name(), self.config.selector, doc.reference);
            return Ok(());
        }
        store(doc.metadata, &self.config.to_field, values, self.config.overwrite);
        Ok(())
    }
}
