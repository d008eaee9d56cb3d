//! Content statistics

use crate::doc::Metadata;
use crate::error::Result;
use crate::handler::{DocumentTagger, HandlerDoc, RestrictionConfig, Restrictions};
use crate::text::reader::{DEFAULT_MAX_READ_SIZE, for_each_text_section};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

fn default_field_prefix() -> String {
    "document.stat.".to_string()
}

fn default_max_read_size() -> usize {
    DEFAULT_MAX_READ_SIZE
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TextStatisticsTaggerConfig {
    #[serde(default = "default_field_prefix")]
    pub field_prefix: String,
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl Default for TextStatisticsTaggerConfig {
    fn default() -> Self {
        Self {
            field_prefix: default_field_prefix(),
            max_read_size: DEFAULT_MAX_READ_SIZE,
            restrictions: Vec::new(),
        }
    }
}

/// Running counts over a text fed in pieces.
///
/// Words are runs of alphanumeric characters (apostrophes allowed inside).
/// A sentence starts with its first word and ends at `.`, `?` or `!`. A
/// paragraph starts with its first visible character and ends at a blank line.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TextStatistics {
    pub characters: usize,
    pub non_space_characters: usize,
    pub words: usize,
    pub word_characters: usize,
    pub sentences: usize,
    pub sentence_characters: usize,
    pub paragraphs: usize,
    in_word: bool,
    in_sentence: bool,
    in_paragraph: bool,
    newlines: usize,
}

impl TextStatistics {
    pub fn feed(&mut self, text: &str) {
        for c in text.chars() {
            self.characters += 1;
            if c.is_whitespace() {
                self.in_word = false;
                if c == '\n' {
                    self.newlines += 1;
                    if self.newlines >= 2 {
                        self.in_paragraph = false;
                        self.in_sentence = false;
                    }
                }
            } else {
                self.non_space_characters += 1;
                self.newlines = 0;
                if !self.in_paragraph {
                    self.in_paragraph = true;
                    self.paragraphs += 1;
                }
            }

            let word_char = c.is_alphanumeric() || (self.in_word && c == '\'');
            if word_char {
                if !self.in_word {
                    self.in_word = true;
                    self.words += 1;
                    if !self.in_sentence {
                        self.in_sentence = true;
                        self.sentences += 1;
                    }
                }
                self.word_characters += 1;
            } else {
                self.in_word = false;
            }

            if self.in_sentence {
                self.sentence_characters += 1;
                if matches!(c, '.' | '?' | '!') {
                    self.in_sentence = false;
                }
            }
        }
    }

    pub fn average_word_characters(&self) -> f64 {
        ratio(self.word_characters, self.words)
    }

    pub fn average_sentence_characters(&self) -> f64 {
        ratio(self.sentence_characters, self.sentences)
    }

    pub fn average_sentence_words(&self) -> f64 {
        ratio(self.words, self.sentences)
    }

    fn write_to(&self, metadata: &mut Metadata, prefix: &str) {
        let counts = [
            ("characterCount", self.characters),
            ("nonSpaceCharacterCount", self.non_space_characters),
            ("wordCount", self.words),
            ("wordCharacterCount", self.word_characters),
            ("sentenceCount", self.sentences),
            ("sentenceCharacterCount", self.sentence_characters),
            ("paragraphCount", self.paragraphs),
        ];
        for (name, count) in counts {
            metadata.set(&format!("{prefix}{name}"), count.to_string());
        }
        let averages = [
            ("averageWordCharacterCount", self.average_word_characters()),
            ("averageSentenceCharacterCount", self.average_sentence_characters()),
            ("averageSentenceWordCount", self.average_sentence_words()),
        ];
        for (name, average) in averages {
            metadata.set(&format!("{prefix}{name}"), format!("{average:.2}"));
        }
    }
}

fn ratio(total: usize, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// Counts characters, words, sentences and paragraphs of the content and
/// stores them under `field_prefix`.
#[derive(Debug)]
pub struct TextStatisticsTagger {
    config: TextStatisticsTaggerConfig,
    restrictions: Restrictions,
}

impl TextStatisticsTagger {
    pub fn new(config: TextStatisticsTaggerConfig) -> Result<Self> {
        Ok(Self {
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &TextStatisticsTaggerConfig {
        &self.config
    }
}

impl DocumentTagger for TextStatisticsTagger {
    fn name(&self) -> &'static str {
        "TextStatisticsTagger"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        let mut stats = TextStatistics::default();
        for_each_text_section(self.name(), doc.reference, doc.content, self.config.max_read_size, |section, _| {
            stats.feed(section);
            Ok(ControlFlow::Continue(()))
        })?;
        stats.write_to(doc.metadata, &self.config.field_prefix);
        Ok(())
    }
}
