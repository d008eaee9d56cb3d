//! Filter on numeric metadata values

use crate::error::{ImporterError, Result};
use crate::filter::condition::NumericCondition;
use crate::handler::{DocumentFilter, HandlerDoc, OnMatch, RestrictionConfig, Restrictions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NumericMetadataFilterConfig {
    pub field: String,
    #[serde(default)]
    pub on_match: OnMatch,
    pub conditions: Vec<NumericCondition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Matches when at least one value of the field is a number satisfying every
/// condition. Values that are not numbers never match.
#[derive(Debug)]
pub struct NumericMetadataFilter {
    config: NumericMetadataFilterConfig,
    restrictions: Restrictions,
}

impl NumericMetadataFilter {
    pub fn new(config: NumericMetadataFilterConfig) -> Result<Self> {
        if config.field.trim().is_empty() {
            return Err(ImporterError::config("NumericMetadataFilter", "a field is required"));
        }
        if config.conditions.iter().any(|c| c.number.is_nan()) {
            return Err(ImporterError::config("NumericMetadataFilter", "condition numbers cannot be NaN"));
        }
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &NumericMetadataFilterConfig {
        &self.config
    }

    fn value_matches(&self, value: &str) -> bool {
        match value.trim().parse::<f64>() {
            Ok(number) if !number.is_nan() => self.config.conditions.iter().all(|c| c.matches(number)),
            _ => {
                tracing::debug!("Value `{}` of field {} is not a number", value, self.config.field);
                false
            }
        }
    }
}

impl DocumentFilter for NumericMetadataFilter {
    fn name(&self) -> &'static str {
        "NumericMetadataFilter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn on_match(&self) -> OnMatch {
        self.config.on_match
    }

    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        Ok(doc
            .metadata
            .get(&self.config.field)
            .iter()
            .any(|value| self.value_matches(value)))
    }
}
