//! Filter on date metadata values

use crate::error::{ImporterError, Result};
use crate::filter::condition::{DateCondition, DateConditionConfig};
use crate::handler::{DocumentFilter, HandlerDoc, OnMatch, RestrictionConfig, Restrictions};
use crate::text::dates::{parse_date, validate_format};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DateMetadataFilterConfig {
    pub field: String,
    /// strftime format of the field values; epoch milliseconds when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default)]
    pub on_match: OnMatch,
    pub conditions: Vec<DateConditionConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

/// Matches when at least one value of the field parses as a date satisfying
/// every condition. Unparseable values never match.
#[derive(Debug)]
pub struct DateMetadataFilter {
    config: DateMetadataFilterConfig,
    conditions: Vec<DateCondition>,
    restrictions: Restrictions,
}

impl DateMetadataFilter {
    pub fn new(config: DateMetadataFilterConfig) -> Result<Self> {
        if config.field.trim().is_empty() {
            return Err(ImporterError::config("DateMetadataFilter", "a field is required"));
        }
        if let Some(format) = &config.format {
            validate_format(format)?;
        }
        let conditions = config
            .conditions
            .iter()
            .map(|c| DateCondition::new("DateMetadataFilter", c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            conditions,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &DateMetadataFilterConfig {
        &self.config
    }

    fn value_matches(&self, value: &str, now: NaiveDateTime) -> bool {
        match parse_date(value, self.config.format.as_deref()) {
            Some(date) => self.conditions.iter().all(|c| c.matches_at(date, now)),
            None => {
                tracing::debug!("Value `{}` of field {} is not a valid date", value, self.config.field);
                false
            }
        }
    }
}

impl DocumentFilter for DateMetadataFilter {
    fn name(&self) -> &'static str {
        "DateMetadataFilter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn on_match(&self) -> OnMatch {
        self.config.on_match
    }

    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        let now = Utc::now().naive_utc();
        Ok(doc
            .metadata
            .get(&self.config.field)
            .iter()
            .any(|value| self.value_matches(value, now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::condition::Operator;
    use crate::testing::{accepts, assert_round_trip, meta};

    fn config(conditions: Vec<DateConditionConfig>) -> DateMetadataFilterConfig {
        DateMetadataFilterConfig {
            field: "published".to_string(),
            format: Some("%Y-%m-%d".to_string()),
            conditions,
            on_match: OnMatch::Include,
            restrictions: Vec::new(),
        }
    }

    fn year_1980s() -> DateMetadataFilter {
        DateMetadataFilter::new(config(vec![
            DateConditionConfig::new(Operator::Ge, "1980-01-01"),
            DateConditionConfig::new(Operator::Lt, "1990-01-01"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_all_conditions_must_hold() {
        let filter = year_1980s();
        assert!(accepts(&filter, "ref", "", &meta(&[("published", "1985-06-01")])));
        assert!(!accepts(&filter, "ref", "", &meta(&[("published", "1990-01-01")])));
        assert!(!accepts(&filter, "ref", "", &meta(&[("published", "1979-12-31")])));
    }

    #[test]
    fn test_any_value_is_enough() {
        let metadata = meta(&[("published", "2001-01-01"), ("published", "1981-01-01")]);
        assert!(accepts(&year_1980s(), "ref", "", &metadata));
    }

    #[test]
    fn test_unparseable_value_is_not_a_match() {
        assert!(!accepts(&year_1980s(), "ref", "", &meta(&[("published", "June 1985")])));
    }

    #[test]
    fn test_relative_condition() {
        let filter = DateMetadataFilter::new(config(vec![DateConditionConfig::new(Operator::Lt, "TODAY-1D")])).unwrap();
        assert!(accepts(&filter, "ref", "", &meta(&[("published", "2000-01-01")])));
        assert!(!accepts(&filter, "ref", "", &meta(&[("published", "2999-01-01")])));
    }

    #[test]
    fn test_epoch_millis_values() {
        let mut cfg = config(vec![DateConditionConfig::new(Operator::Gt, "1970-01-01")]);
        cfg.format = None;
        let filter = DateMetadataFilter::new(cfg).unwrap();
        assert!(accepts(&filter, "ref", "", &meta(&[("published", "86400000")])));
        assert!(!accepts(&filter, "ref", "", &meta(&[("published", "0")])));
    }

    #[test]
    fn test_relative_bounds_use_the_epoch_clock() {
        let mut cfg = config(vec![DateConditionConfig::new(Operator::Gt, "NOW-1h")]);
        cfg.format = None;
        let filter = DateMetadataFilter::new(cfg).unwrap();
        let minutes_ago = |minutes: i64| (Utc::now().timestamp_millis() - minutes * 60_000).to_string();
        assert!(accepts(&filter, "ref", "", &meta(&[("published", &minutes_ago(30))])));
        assert!(!accepts(&filter, "ref", "", &meta(&[("published", &minutes_ago(120))])));
    }

    #[test]
    fn test_invalid_configuration() {
        let mut cfg = config(vec![DateConditionConfig::new(Operator::Gt, "1970-01-01")]);
        cfg.format = Some("%Q".to_string());
        assert!(DateMetadataFilter::new(cfg).is_err());
        assert!(DateMetadataFilter::new(config(vec![DateConditionConfig::new(Operator::Gt, "later")])).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(year_1980s().config());
    }
}
