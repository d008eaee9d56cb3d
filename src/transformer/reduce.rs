//! Collapse repeated strings in content

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTransformer, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::pattern::{MatchMode, compile, literal};
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, transform_text_sections};
use crate::transformer::default_max_read_size;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReduceConsecutivesTransformerConfig {
    /// Strings to reduce. `\n`, `\r`, `\t` and `\s` (a space) are unescaped.
    pub reductions: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl ReduceConsecutivesTransformerConfig {
    pub fn new<I, S>(reductions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            reductions: reductions.into_iter().map(Into::into).collect(),
            case_sensitive: false,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\n", "\n")
        .replace("\\r", "\r")
        .replace("\\t", "\t")
        .replace("\\s", " ")
}

/// Replaces runs of the same string with its first occurrence.
#[derive(Debug)]
pub struct ReduceConsecutivesTransformer {
    config: ReduceConsecutivesTransformerConfig,
    regexes: Vec<Regex>,
    restrictions: Restrictions,
}

impl ReduceConsecutivesTransformer {
    pub fn new(config: ReduceConsecutivesTransformerConfig) -> Result<Self> {
        let mut regexes = Vec::with_capacity(config.reductions.len());
        for reduction in &config.reductions {
            let target = unescape(reduction);
            if target.is_empty() {
                return Err(ImporterError::config(
                    "ReduceConsecutivesTransformer",
                    "reductions cannot be empty",
                ));
            }
            let escaped = literal(&target);
            let pattern = format!("({escaped})(?:{escaped})+");
            regexes.push(compile(&pattern, config.case_sensitive, MatchMode::Find)?);
        }
        Ok(Self {
            regexes,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &ReduceConsecutivesTransformerConfig {
        &self.config
    }
}

impl DocumentTransformer for ReduceConsecutivesTransformer {
    fn name(&self) -> &'static str {
        "ReduceConsecutivesTransformer"
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
                for regex in &self.regexes {
                    let reduced = regex.replace_all(section, "${1}").into_owned();
                    *section = reduced;
                }
                Ok(())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_round_trip, meta, transform};

    #[test]
    fn test_reduce_escaped_and_plain_strings() {
        let transformer =
            ReduceConsecutivesTransformer::new(ReduceConsecutivesTransformerConfig::new(["\\n", "\\s", "ab"])).unwrap();
        let mut metadata = meta(&[]);
        let out = transform(&transformer, "one\n\n\ntwo   three abABab.", &mut metadata);
        assert_eq!(out, "one\ntwo three ab.");
    }

    #[test]
    fn test_case_sensitive_keeps_other_case() {
        let mut config = ReduceConsecutivesTransformerConfig::new(["ab"]);
        config.case_sensitive = true;
        let transformer = ReduceConsecutivesTransformer::new(config).unwrap();
        let mut metadata = meta(&[]);
        assert_eq!(transform(&transformer, "ababABAB", &mut metadata), "abABAB");
    }

    #[test]
    fn test_empty_reduction_is_rejected() {
        assert!(ReduceConsecutivesTransformer::new(ReduceConsecutivesTransformerConfig::new([""])).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(&ReduceConsecutivesTransformerConfig::new(["\\t", "--"]));
    }
}
