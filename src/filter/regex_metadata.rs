//! Filter on metadata field values

use crate::error::Result;
use crate::handler::{DocumentFilter, HandlerDoc, OnMatch, RestrictionConfig, Restrictions};
use crate::text::pattern::{CachedRegex, MatchMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegexMetadataFilterConfig {
    pub field: String,
    /// Regex the whole value must match.
    pub pattern: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub on_match: OnMatch,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl RegexMetadataFilterConfig {
    pub fn new(field: impl Into<String>, pattern: impl Into<String>, on_match: OnMatch) -> Self {
        Self {
            field: field.into(),
            pattern: pattern.into(),
            case_sensitive: false,
            on_match,
            restrictions: Vec::new(),
        }
    }
}

/// Matches when any value of a field matches the pattern. An absent field
/// never matches.
#[derive(Debug)]
pub struct RegexMetadataFilter {
    config: RegexMetadataFilterConfig,
    regex: CachedRegex,
    restrictions: Restrictions,
}

impl RegexMetadataFilter {
    pub fn new(config: RegexMetadataFilterConfig) -> Result<Self> {
        Ok(Self {
            regex: CachedRegex::compiled(&config.pattern, config.case_sensitive, MatchMode::Whole)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &RegexMetadataFilterConfig {
        &self.config
    }
}

impl DocumentFilter for RegexMetadataFilter {
    fn name(&self) -> &'static str {
        "RegexMetadataFilter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn on_match(&self) -> OnMatch {
        self.config.on_match
    }

    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        for value in doc.metadata.get(&self.config.field) {
            if self.regex.is_match(value)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{accepts, assert_round_trip, meta};

    fn filter(pattern: &str, on_match: OnMatch) -> RegexMetadataFilter {
        RegexMetadataFilter::new(RegexMetadataFilterConfig::new("title", pattern, on_match)).unwrap()
    }

    #[test]
    fn test_exclude_on_match() {
        let exclude = filter(".*string.*", OnMatch::Exclude);
        assert!(!accepts(&exclude, "ref", "", &meta(&[("title", "a string to match")])));
        assert!(accepts(&exclude, "ref", "", &meta(&[("title", "no match here")])));
    }

    #[test]
    fn test_any_value_matches() {
        let include = filter("keep.*", OnMatch::Include);
        let metadata = meta(&[("title", "drop this"), ("title", "Keep that")]);
        assert!(accepts(&include, "ref", "", &metadata));
    }

    #[test]
    fn test_absent_field_never_matches() {
        assert!(!accepts(&filter(".*", OnMatch::Include), "ref", "", &meta(&[])));
        assert!(accepts(&filter(".*", OnMatch::Exclude), "ref", "", &meta(&[])));
    }

    #[test]
    fn test_restriction_skips_filter() {
        let mut config = RegexMetadataFilterConfig::new("title", ".*string.*", OnMatch::Exclude);
        config.restrictions.push(RestrictionConfig::new("author", "Pascal.*"));
        let filter = RegexMetadataFilter::new(config).unwrap();

        let other_author = meta(&[("title", "a string to match"), ("author", "Someone Else")]);
        assert!(accepts(&filter, "ref", "", &other_author));

        let restricted_author = meta(&[("title", "a string to match"), ("author", "Pascal Essiembre")]);
        assert!(!accepts(&filter, "ref", "", &restricted_author));
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(&RegexMetadataFilterConfig::new("title", "^A.*", OnMatch::Include));
    }
}
