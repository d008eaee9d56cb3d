//! Strip parts of the content delimited by patterns
//!
//! All three transformers work on one section at a time: each section is
//! searched on its own, so a marker found in several sections applies to
//! each of them.

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTransformer, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::pattern::{MatchMode, compile};
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, transform_text_sections};
use crate::transformer::default_max_read_size;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StripBeforeTransformerConfig {
    pub pattern: String,
    /// Strip the match as well.
    #[serde(default)]
    pub inclusive: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl StripBeforeTransformerConfig {
    pub fn new(pattern: impl Into<String>, inclusive: bool) -> Self {
        Self {
            pattern: pattern.into(),
            inclusive,
            case_sensitive: false,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Removes everything before the first match of the pattern.
#[derive(Debug)]
pub struct StripBeforeTransformer {
    config: StripBeforeTransformerConfig,
    regex: Regex,
    restrictions: Restrictions,
}

impl StripBeforeTransformer {
    pub fn new(config: StripBeforeTransformerConfig) -> Result<Self> {
        Ok(Self {
            regex: compile(&config.pattern, config.case_sensitive, MatchMode::Find)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &StripBeforeTransformerConfig {
        &self.config
    }
}

impl DocumentTransformer for StripBeforeTransformer {
    fn name(&self) -> &'static str {
        "StripBeforeTransformer"
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
                if let Some(m) = self.regex.find(section) {
                    let cut = if self.config.inclusive { m.end() } else { m.start() };
                    section.drain(..cut);
                }
                Ok(())
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StripAfterTransformerConfig {
    pub pattern: String,
    /// Strip the match as well.
    #[serde(default)]
    pub inclusive: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl StripAfterTransformerConfig {
    pub fn new(pattern: impl Into<String>, inclusive: bool) -> Self {
        Self {
            pattern: pattern.into(),
            inclusive,
            case_sensitive: false,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Removes everything after the first match of the pattern.
#[derive(Debug)]
pub struct StripAfterTransformer {
    config: StripAfterTransformerConfig,
    regex: Regex,
    restrictions: Restrictions,
}

impl StripAfterTransformer {
    pub fn new(config: StripAfterTransformerConfig) -> Result<Self> {
        Ok(Self {
            regex: compile(&config.pattern, config.case_sensitive, MatchMode::Find)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &StripAfterTransformerConfig {
        &self.config
    }
}

impl DocumentTransformer for StripAfterTransformer {
    fn name(&self) -> &'static str {
        "StripAfterTransformer"
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
                if let Some(m) = self.regex.find(section) {
                    let cut = if self.config.inclusive { m.start() } else { m.end() };
                    section.truncate(cut);
                }
                Ok(())
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct StripBetweenTransformerConfig {
    pub start: String,
    pub end: String,
    /// Strip the start and end matches too.
    #[serde(default)]
    pub inclusive: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl StripBetweenTransformerConfig {
    pub fn new(start: impl Into<String>, end: impl Into<String>, inclusive: bool) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            inclusive,
            case_sensitive: false,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Removes every span opened by `start` and closed by `end`.
#[derive(Debug)]
pub struct StripBetweenTransformer {
    config: StripBetweenTransformerConfig,
    start: Regex,
    end: Regex,
    restrictions: Restrictions,
}

impl StripBetweenTransformer {
    pub fn new(config: StripBetweenTransformerConfig) -> Result<Self> {
        if config.start.is_empty() || config.end.is_empty() {
            return Err(ImporterError::config(
                "StripBetweenTransformer",
                "`start` and `end` are required",
            ));
        }
        Ok(Self {
            start: compile(&config.start, config.case_sensitive, MatchMode::Find)?,
            end: compile(&config.end, config.case_sensitive, MatchMode::Find)?,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &StripBetweenTransformerConfig {
        &self.config
    }

    fn strip(&self, section: &str) -> String {
        let mut out = String::with_capacity(section.len());
        let mut offset = 0;
        while let Some(start) = self.start.find_at(section, offset) {
            let Some(end) = self.end.find_at(section, start.end()) else {
                break;
            };
            if self.config.inclusive {
                out.push_str(&section[offset..start.start()]);
            } else {
                out.push_str(&section[offset..start.end()]);
                out.push_str(end.as_str());
            }
            if end.end() == offset {
                // Empty markers matched in place, nothing left to strip
                break;
            }
            offset = end.end();
        }
        out.push_str(&section[offset..]);
        out
    }
}

impl DocumentTransformer for StripBetweenTransformer {
    fn name(&self) -> &'static str {
        "StripBetweenTransformer"
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
                *section = self.strip(section);
                Ok(())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_round_trip, meta, transform};

    const TEXT: &str = "header <!-- start --> body text <!-- end --> footer";

    fn run(transformer: &dyn DocumentTransformer, text: &str) -> String {
        let mut metadata = meta(&[]);
        transform(transformer, text, &mut metadata)
    }

    #[test]
    fn test_strip_before() {
        let exclusive = StripBeforeTransformer::new(StripBeforeTransformerConfig::new("<!-- START -->", false)).unwrap();
        assert_eq!(run(&exclusive, TEXT), "<!-- start --> body text <!-- end --> footer");

        let inclusive = StripBeforeTransformer::new(StripBeforeTransformerConfig::new("<!-- start -->", true)).unwrap();
        assert_eq!(run(&inclusive, TEXT), " body text <!-- end --> footer");
    }

    #[test]
    fn test_strip_after() {
        let exclusive = StripAfterTransformer::new(StripAfterTransformerConfig::new("<!-- end -->", false)).unwrap();
        assert_eq!(run(&exclusive, TEXT), "header <!-- start --> body text <!-- end -->");

        let inclusive = StripAfterTransformer::new(StripAfterTransformerConfig::new("<!-- end -->", true)).unwrap();
        assert_eq!(run(&inclusive, TEXT), "header <!-- start --> body text ");
    }

    #[test]
    fn test_no_match_keeps_section() {
        let transformer = StripBeforeTransformer::new(StripBeforeTransformerConfig::new("missing", true)).unwrap();
        assert_eq!(run(&transformer, TEXT), TEXT);
    }

    #[test]
    fn test_strip_between() {
        let text = "keep [a] this [b] and [c";
        let inclusive =
            StripBetweenTransformer::new(StripBetweenTransformerConfig::new(r"\[", r"\]", true)).unwrap();
        assert_eq!(run(&inclusive, text), "keep  this  and [c");

        let exclusive =
            StripBetweenTransformer::new(StripBetweenTransformerConfig::new(r"\[", r"\]", false)).unwrap();
        assert_eq!(run(&exclusive, text), "keep [] this [] and [c");
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(&StripBeforeTransformerConfig::new("^Title:", true));
        assert_round_trip(&StripAfterTransformerConfig::new("--\\s*$", false));
        assert_round_trip(&StripBetweenTransformerConfig::new("<script>", "</script>", true));
    }
}
