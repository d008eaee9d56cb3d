//! Reformat date values

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::tagger::store;
use crate::text::dates::{format_date, parse_date, validate_format};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DateFormatTaggerConfig {
    pub from_field: String,
    /// Defaults to `from_field`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_field: Option<String>,
    /// Formats tried in order. Empty means values are epoch milliseconds.
    #[serde(default)]
    pub from_formats: Vec<String>,
    /// Epoch milliseconds when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_format: Option<String>,
    /// Keep values no format could parse instead of dropping them.
    #[serde(default)]
    pub keep_bad_dates: bool,
    #[serde(default)]
    pub overwrite: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl DateFormatTaggerConfig {
    pub fn new(from_field: impl Into<String>) -> Self {
        Self {
            from_field: from_field.into(),
            to_field: None,
            from_formats: Vec::new(),
            to_format: None,
            keep_bad_dates: false,
            overwrite: false,
            restrictions: Vec::new(),
        }
    }
}

/// Parses the values of a field with one of several formats and writes
/// them back in a single format.
#[derive(Debug)]
pub struct DateFormatTagger {
    config: DateFormatTaggerConfig,
    restrictions: Restrictions,
}

impl DateFormatTagger {
    pub fn new(config: DateFormatTaggerConfig) -> Result<Self> {
        if config.from_field.trim().is_empty() {
            return Err(ImporterError::config("DateFormatTagger", "`from-field` cannot be blank"));
        }
        for format in config.from_formats.iter().chain(config.to_format.as_ref()) {
            validate_format(format)?;
        }
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &DateFormatTaggerConfig {
        &self.config
    }

    fn target_field(&self) -> &str {
        self.config.to_field.as_deref().unwrap_or(&self.config.from_field)
    }

    fn reformat(&self, value: &str) -> Option<String> {
        let date = if self.config.from_formats.is_empty() {
            parse_date(value, None)
        } else {
            self.config
                .from_formats
                .iter()
                .find_map(|format| parse_date(value, Some(format)))
        }?;
        format_date(date, self.config.to_format.as_deref())
    }
}

impl DocumentTagger for DateFormatTagger {
    fn name(&self) -> &'static str {
        "DateFormatTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let mut formatted = Vec::new();
        for value in doc.metadata.get(&self.config.from_field) {
            match self.reformat(value) {
                Some(date) => formatted.push(date),
                None if self.config.keep_bad_dates => formatted.push(value.clone()),
                None => tracing::warn!(
                    "Could not parse date `{}` of field {} in {}, dropping it",
                    value,
                    self.config.from_field,
                    doc.reference
                ),
            }
        }
        let target = self.target_field();
        if formatted.is_empty() && !self.config.overwrite {
            return Ok(());
        }
        store(doc.metadata, target, formatted, self.config.overwrite);
        Ok(())
    }
}
