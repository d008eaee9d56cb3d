//! Field-set resolution
//!
//! Taggers that operate on several fields name them with a [`FieldMatcher`]:
//! literal names, a regex, or both. The matcher is resolved against the
//! metadata of each document at call time since fields vary per document.

use crate::doc::Metadata;
use crate::error::{ImporterError, Result};
use crate::text::pattern::{CachedRegex, MatchMode};
use serde::{Deserialize, Serialize};

/// Declarative form of a [`FieldMatcher`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FieldMatcherConfig {
    /// Literal field names, matched exactly.
    pub names: Vec<String>,
    /// Regex matched against the whole field name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// Applies to `regex` only; regex matching ignores case unless set.
    pub case_sensitive: bool,
}

impl FieldMatcherConfig {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            regex: Some(pattern.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.regex.is_none()
    }
}

/// Compiled field matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMatcher {
    names: Vec<String>,
    regex: Option<CachedRegex>,
}

impl FieldMatcher {
    pub fn new(config: &FieldMatcherConfig) -> Result<Self> {
        let regex = config
            .regex
            .as_deref()
            .map(|p| CachedRegex::compiled(p, config.case_sensitive, MatchMode::Whole))
            .transpose()?;
        Ok(Self {
            names: config.names.clone(),
            regex,
        })
    }

    /// Like [`FieldMatcher::new`] but rejects a matcher that names nothing.
    pub fn required(handler: &'static str, config: &FieldMatcherConfig) -> Result<Self> {
        if config.is_empty() {
            return Err(ImporterError::config(
                handler,
                "a field name or field regex is required",
            ));
        }
        Self::new(config)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.regex.is_none()
    }

    pub fn matches(&self, field: &str) -> Result<bool> {
        if self.names.iter().any(|n| n == field) {
            return Ok(true);
        }
        match &self.regex {
            Some(regex) => regex.is_match(field),
            None => Ok(false),
        }
    }

    /// Names of the fields of `metadata` this matcher selects, in metadata order.
    pub fn resolve(&self, metadata: &Metadata) -> Result<Vec<String>> {
        let mut resolved = Vec::new();
        for field in metadata.field_names() {
            if self.matches(field)? {
                resolved.push(field.to_string());
            }
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Metadata {
        [
            ("Title", "t"),
            ("author", "a"),
            ("X-Custom-One", "1"),
            ("x-custom-two", "2"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_resolve_literal_names() {
        let matcher = FieldMatcher::new(&FieldMatcherConfig::names(["author", "missing"])).unwrap();
        assert_eq!(matcher.resolve(&sample()).unwrap(), vec!["author"]);
    }

    #[test]
    fn test_literal_names_are_exact() {
        let matcher = FieldMatcher::new(&FieldMatcherConfig::names(["title"])).unwrap();
        assert!(matcher.resolve(&sample()).unwrap().is_empty());
    }

    #[test]
    fn test_regex_ignores_case_by_default() {
        let matcher = FieldMatcher::new(&FieldMatcherConfig::regex("x-custom-.*")).unwrap();
        assert_eq!(
            matcher.resolve(&sample()).unwrap(),
            vec!["X-Custom-One", "x-custom-two"]
        );

        let config = FieldMatcherConfig {
            case_sensitive: true,
            ..FieldMatcherConfig::regex("x-custom-.*")
        };
        let matcher = FieldMatcher::new(&config).unwrap();
        assert_eq!(matcher.resolve(&sample()).unwrap(), vec!["x-custom-two"]);
    }

    #[test]
    fn test_no_match_is_not_an_error() {
        let matcher = FieldMatcher::new(&FieldMatcherConfig::regex("nothing.*")).unwrap();
        assert!(matcher.resolve(&sample()).unwrap().is_empty());
    }

    #[test]
    fn test_required_rejects_empty_matcher() {
        assert!(FieldMatcher::required("Test", &FieldMatcherConfig::default()).is_err());
        assert!(FieldMatcher::new(&FieldMatcherConfig::regex("(")).is_err());
    }
}
