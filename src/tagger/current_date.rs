//! Stamp documents with the current date

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::tagger::OnConflict;
use crate::text::dates::{format_date, validate_format};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATE_FIELD: &str = "docsift.importer.date";

fn default_to_field() -> String {
    DEFAULT_DATE_FIELD.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CurrentDateTaggerConfig {
    #[serde(default = "default_to_field")]
    pub to_field: String,
    /// Local-time format; epoch milliseconds when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub on_conflict: OnConflict,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl Default for CurrentDateTaggerConfig {
    fn default() -> Self {
        Self {
            to_field: default_to_field(),
            format: None,
            on_conflict: OnConflict::default(),
            restrictions: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct CurrentDateTagger {
    config: CurrentDateTaggerConfig,
    restrictions: Restrictions,
}

impl CurrentDateTagger {
    pub fn new(config: CurrentDateTaggerConfig) -> Result<Self> {
        if let Some(format) = &config.format {
            validate_format(format)?;
        }
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &CurrentDateTaggerConfig {
        &self.config
    }

    fn stamp(&self, now: DateTime<Local>) -> Option<String> {
        match &self.config.format {
            None => Some(now.timestamp_millis().to_string()),
            Some(format) => format_date(now.naive_local(), Some(format)),
        }
    }

    /// Tag as if the current time were `now`.
    pub fn tag_at(&self, doc: &mut HandlerDoc<'_>, now: DateTime<Local>) -> Result<()> {
        let stamp = self.stamp(now).ok_or_else(|| ImporterError::Handler {
            handler: self.name(),
            reference: doc.reference.to_string(),
            message: "current date could not be formatted".to_string(),
        })?;
        self.config
            .on_conflict
            .store(doc.metadata, &self.config.to_field, [stamp]);
        Ok(())
    }
}

impl DocumentTagger for CurrentDateTagger {
    fn name(&self) -> &'static str {
        "CurrentDateTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        self.tag_at(doc, Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::HandlerDoc;
    use crate::testing::{assert_round_trip, meta, tag};
    use chrono::TimeZone;

    #[test]
    fn test_formatted_stamp() {
        let tagger = CurrentDateTagger::new(CurrentDateTaggerConfig {
            to_field: "imported".to_string(),
            format: Some("%Y-%m-%d %H:%M".to_string()),
            on_conflict: OnConflict::Replace,
            restrictions: Vec::new(),
        })
        .unwrap();
        let now = Local.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        let mut metadata = meta(&[("imported", "earlier")]);
        let mut content = std::io::empty();
        let mut doc = HandlerDoc::new("ref", &mut content, &mut metadata, false);
        tagger.tag_at(&mut doc, now).unwrap();
        assert_eq!(metadata.get("imported"), ["2024-05-17 08:30"]);
    }

    #[test]
    fn test_default_stamp_is_epoch_millis() {
        let tagger = CurrentDateTagger::new(CurrentDateTaggerConfig::default()).unwrap();
        let before = Local::now().timestamp_millis();
        let mut metadata = meta(&[]);
        tag(&tagger, "", &mut metadata);
        let stamped: i64 = metadata.first(DEFAULT_DATE_FIELD).unwrap().parse().unwrap();
        assert!(stamped >= before);
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(&CurrentDateTaggerConfig {
            format: Some("%Y".to_string()),
            on_conflict: OnConflict::Noop,
            ..CurrentDateTaggerConfig::default()
        });
    }
}
