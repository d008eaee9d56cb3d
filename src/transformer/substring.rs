//! Keep a character range of the content

use crate::error::{ImporterError, Result};
use crate::handler::{DocumentTransformer, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, transform_text_sections};
use crate::transformer::default_max_read_size;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SubstringTransformerConfig {
    /// First character kept, counting from zero.
    #[serde(default)]
    pub begin: usize,
    /// First character dropped; the end of the content when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<usize>,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl SubstringTransformerConfig {
    pub fn new(begin: usize, end: Option<usize>) -> Self {
        Self {
            begin,
            end,
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Keeps characters `[begin, end)` of the whole content. Offsets are counted
/// across sections.
#[derive(Debug)]
pub struct SubstringTransformer {
    config: SubstringTransformerConfig,
    restrictions: Restrictions,
}

impl SubstringTransformer {
    pub fn new(config: SubstringTransformerConfig) -> Result<Self> {
        if let Some(end) = config.end
            && end < config.begin
        {
            return Err(ImporterError::config(
                "SubstringTransformer",
                format!("end ({end}) is before begin ({})", config.begin),
            ));
        }
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &SubstringTransformerConfig {
        &self.config
    }
}

impl DocumentTransformer for SubstringTransformer {
    fn name(&self) -> &'static str {
        "SubstringTransformer"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn transform_applicable_document(&self, doc: &mut HandlerDoc<'_>, output: &mut dyn Write) -> Result<()> {
        let begin = self.config.begin;
        let end = self.config.end.unwrap_or(usize::MAX);
        let mut offset = 0usize;
        transform_text_sections(
            self.name(),
            doc.reference,
            doc.content,
            output,
            self.config.max_read_size,
            |section, _| {
                let length = section.chars().count();
                let from = begin.saturating_sub(offset).min(length);
                let to = end.saturating_sub(offset).min(length);
                offset += length;
                *section = section.chars().skip(from).take(to.saturating_sub(from)).collect();
                Ok(())
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_round_trip, meta, transform};

    fn run(begin: usize, end: Option<usize>, max_read_size: usize, text: &str) -> String {
        let mut config = SubstringTransformerConfig::new(begin, end);
        config.max_read_size = max_read_size;
        let transformer = SubstringTransformer::new(config).unwrap();
        let mut metadata = meta(&[]);
        transform(&transformer, text, &mut metadata)
    }

    #[test]
    fn test_range() {
        assert_eq!(run(4, Some(9), 100, "One, two, three"), "two, ");
        assert_eq!(run(10, None, 100, "One, two, three"), "three");
        assert_eq!(run(50, None, 100, "short"), "");
    }

    #[test]
    fn test_range_across_sections() {
        let text: String = (0..40).map(|i| format!("w{i:02} ")).collect();
        let expected: String = text.chars().skip(25).take(60).collect();
        assert_eq!(run(25, Some(85), 7, &text), expected);
        assert_eq!(run(25, Some(85), 10_000, &text), expected);
    }

    #[test]
    fn test_multibyte_characters() {
        assert_eq!(run(1, Some(3), 100, "héllo"), "él");
    }

    #[test]
    fn test_end_before_begin_is_rejected() {
        assert!(SubstringTransformer::new(SubstringTransformerConfig::new(5, Some(2))).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        assert_round_trip(&SubstringTransformerConfig::new(3, Some(10)));
    }
}
