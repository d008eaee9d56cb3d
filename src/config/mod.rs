//! Configuration for docsift
//!
//! Every handler has a serde configuration type living next to it. This
//! module ties them together: [`HandlerConfig`] is the tagged union used in
//! configuration files and [`ImporterConfig`] holds the two handler lists an
//! import runs through, before and after content parsing.
//!
//! ```toml
//! max-read-size = 10000
//!
//! [[pre-parse-handlers]]
//! type = "reference-filter"
//! pattern = ".*\\.pdf"
//! on-match = "exclude"
//!
//! [[post-parse-handlers]]
//! type = "constant-tagger"
//! constants = { source = ["docsift"] }
//! ```

pub mod core;

use crate::error::Result;
use crate::filter::{
    DateMetadataFilter, DateMetadataFilterConfig, DomContentFilter, DomContentFilterConfig, EmptyFilter,
    EmptyFilterConfig, EmptyMetadataFilter, EmptyMetadataFilterConfig, NumericMetadataFilter,
    NumericMetadataFilterConfig, ReferenceFilter, ReferenceFilterConfig, RegexContentFilter, RegexContentFilterConfig,
    RegexMetadataFilter, RegexMetadataFilterConfig,
};
use crate::handler::Handler;
use crate::pipeline::{HandlerChain, Importer};
use crate::splitter::{CsvSplitter, CsvSplitterConfig};
use crate::tagger::{
    CharacterCaseTagger, CharacterCaseTaggerConfig, ConstantTagger, ConstantTaggerConfig, CopyTagger, CopyTaggerConfig,
    CurrentDateTagger, CurrentDateTaggerConfig, DateFormatTagger, DateFormatTaggerConfig, DeleteTagger,
    DeleteTaggerConfig, DomTagger, DomTaggerConfig, ForceSingleValueTagger, ForceSingleValueTaggerConfig,
    KeepOnlyTagger, KeepOnlyTaggerConfig, LanguageTagger, LanguageTaggerConfig, MergeTagger, MergeTaggerConfig,
    RenameTagger, RenameTaggerConfig, ReplaceTagger, ReplaceTaggerConfig, SplitTagger, SplitTaggerConfig,
    TextBetweenTagger, TextBetweenTaggerConfig, TextPatternTagger, TextPatternTaggerConfig, TextStatisticsTagger,
    TextStatisticsTaggerConfig,
};
use crate::text::reader::DEFAULT_MAX_READ_SIZE;
use crate::transformer::{
    CharacterCaseTransformer, CharacterCaseTransformerConfig, ReduceConsecutivesTransformer,
    ReduceConsecutivesTransformerConfig, ReplaceTransformer, ReplaceTransformerConfig, StripAfterTransformer,
    StripAfterTransformerConfig, StripBeforeTransformer, StripBeforeTransformerConfig, StripBetweenTransformer,
    StripBetweenTransformerConfig, SubstringTransformer, SubstringTransformerConfig,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use self::core::{CONFIG_ENV_PREFIX, ConfigFormat};

/// Configuration of any handler, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HandlerConfig {
    // Filters
    ReferenceFilter(ReferenceFilterConfig),
    RegexMetadataFilter(RegexMetadataFilterConfig),
    RegexContentFilter(RegexContentFilterConfig),
    EmptyMetadataFilter(EmptyMetadataFilterConfig),
    EmptyFilter(EmptyFilterConfig),
    NumericMetadataFilter(NumericMetadataFilterConfig),
    DateMetadataFilter(DateMetadataFilterConfig),
    DomContentFilter(DomContentFilterConfig),

    // Taggers
    ConstantTagger(ConstantTaggerConfig),
    CopyTagger(CopyTaggerConfig),
    RenameTagger(RenameTaggerConfig),
    DeleteTagger(DeleteTaggerConfig),
    KeepOnlyTagger(KeepOnlyTaggerConfig),
    ForceSingleValueTagger(ForceSingleValueTaggerConfig),
    CharacterCaseTagger(CharacterCaseTaggerConfig),
    DateFormatTagger(DateFormatTaggerConfig),
    SplitTagger(SplitTaggerConfig),
    MergeTagger(MergeTaggerConfig),
    ReplaceTagger(ReplaceTaggerConfig),
    TextPatternTagger(TextPatternTaggerConfig),
    TextBetweenTagger(TextBetweenTaggerConfig),
    DomTagger(DomTaggerConfig),
    CurrentDateTagger(CurrentDateTaggerConfig),
    TextStatisticsTagger(TextStatisticsTaggerConfig),
    LanguageTagger(LanguageTaggerConfig),

    // Transformers
    ReplaceTransformer(ReplaceTransformerConfig),
    ReduceConsecutivesTransformer(ReduceConsecutivesTransformerConfig),
    StripBeforeTransformer(StripBeforeTransformerConfig),
    StripAfterTransformer(StripAfterTransformerConfig),
    StripBetweenTransformer(StripBetweenTransformerConfig),
    CharacterCaseTransformer(CharacterCaseTransformerConfig),
    SubstringTransformer(SubstringTransformerConfig),

    // Splitters
    CsvSplitter(CsvSplitterConfig),
}

impl HandlerConfig {
    /// Build the handler, validating the configuration.
    pub fn build(&self) -> Result<Handler> {
        use HandlerConfig as C;

        let handler = match self.clone() {
            C::ReferenceFilter(c) => Handler::Filter(Box::new(ReferenceFilter::new(c)?)),
            C::RegexMetadataFilter(c) => Handler::Filter(Box::new(RegexMetadataFilter::new(c)?)),
            C::RegexContentFilter(c) => Handler::Filter(Box::new(RegexContentFilter::new(c)?)),
            C::EmptyMetadataFilter(c) => Handler::Filter(Box::new(EmptyMetadataFilter::new(c)?)),
            C::EmptyFilter(c) => Handler::Filter(Box::new(EmptyFilter::new(c)?)),
            C::NumericMetadataFilter(c) => Handler::Filter(Box::new(NumericMetadataFilter::new(c)?)),
            C::DateMetadataFilter(c) => Handler::Filter(Box::new(DateMetadataFilter::new(c)?)),
            C::DomContentFilter(c) => Handler::Filter(Box::new(DomContentFilter::new(c)?)),

            C::ConstantTagger(c) => Handler::Tagger(Box::new(ConstantTagger::new(c)?)),
            C::CopyTagger(c) => Handler::Tagger(Box::new(CopyTagger::new(c)?)),
            C::RenameTagger(c) => Handler::Tagger(Box::new(RenameTagger::new(c)?)),
            C::DeleteTagger(c) => Handler::Tagger(Box::new(DeleteTagger::new(c)?)),
            C::KeepOnlyTagger(c) => Handler::Tagger(Box::new(KeepOnlyTagger::new(c)?)),
            C::ForceSingleValueTagger(c) => Handler::Tagger(Box::new(ForceSingleValueTagger::new(c)?)),
            C::CharacterCaseTagger(c) => Handler::Tagger(Box::new(CharacterCaseTagger::new(c)?)),
            C::DateFormatTagger(c) => Handler::Tagger(Box::new(DateFormatTagger::new(c)?)),
            C::SplitTagger(c) => Handler::Tagger(Box::new(SplitTagger::new(c)?)),
            C::MergeTagger(c) => Handler::Tagger(Box::new(MergeTagger::new(c)?)),
            C::ReplaceTagger(c) => Handler::Tagger(Box::new(ReplaceTagger::new(c)?)),
            C::TextPatternTagger(c) => Handler::Tagger(Box::new(TextPatternTagger::new(c)?)),
            C::TextBetweenTagger(c) => Handler::Tagger(Box::new(TextBetweenTagger::new(c)?)),
            C::DomTagger(c) => Handler::Tagger(Box::new(DomTagger::new(c)?)),
            C::CurrentDateTagger(c) => Handler::Tagger(Box::new(CurrentDateTagger::new(c)?)),
            C::TextStatisticsTagger(c) => Handler::Tagger(Box::new(TextStatisticsTagger::new(c)?)),
            C::LanguageTagger(c) => Handler::Tagger(Box::new(LanguageTagger::new(c)?)),

            C::ReplaceTransformer(c) => Handler::Transformer(Box::new(ReplaceTransformer::new(c)?)),
            C::ReduceConsecutivesTransformer(c) => {
                Handler::Transformer(Box::new(ReduceConsecutivesTransformer::new(c)?))
            }
            C::StripBeforeTransformer(c) => Handler::Transformer(Box::new(StripBeforeTransformer::new(c)?)),
            C::StripAfterTransformer(c) => Handler::Transformer(Box::new(StripAfterTransformer::new(c)?)),
            C::StripBetweenTransformer(c) => Handler::Transformer(Box::new(StripBetweenTransformer::new(c)?)),
            C::CharacterCaseTransformer(c) => Handler::Transformer(Box::new(CharacterCaseTransformer::new(c)?)),
            C::SubstringTransformer(c) => Handler::Transformer(Box::new(SubstringTransformer::new(c)?)),

            C::CsvSplitter(c) => Handler::Splitter(Box::new(CsvSplitter::new(c)?)),
        };
        Ok(handler)
    }
}

fn default_max_read_size() -> usize {
    DEFAULT_MAX_READ_SIZE
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ImporterConfig {
    /// Section size used when decoding content between the two handler lists.
    #[serde(default = "default_max_read_size")]
    pub max_read_size: usize,

    /// Handlers run on the raw content.
    #[serde(default)]
    pub pre_parse_handlers: Vec<HandlerConfig>,

    /// Handlers run once content is decoded text.
    #[serde(default)]
    pub post_parse_handlers: Vec<HandlerConfig>,
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            max_read_size: DEFAULT_MAX_READ_SIZE,
            pre_parse_handlers: Vec::new(),
            post_parse_handlers: Vec::new(),
        }
    }
}

impl ImporterConfig {
    /// Build every handler. The first invalid one aborts with its position.
    pub fn build(&self) -> anyhow::Result<Importer> {
        if self.max_read_size == 0 {
            anyhow::bail!("max-read-size must be greater than zero");
        }
        let pre_parse = build_chain(&self.pre_parse_handlers, "pre-parse")?;
        let post_parse = build_chain(&self.post_parse_handlers, "post-parse")?;
        Ok(Importer::new(self.max_read_size, pre_parse, post_parse))
    }

    /// Check that every handler builds.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.build().map(|_| ())
    }

    pub fn handler_count(&self) -> usize {
        self.pre_parse_handlers.len() + self.post_parse_handlers.len()
    }
}

fn build_chain(configs: &[HandlerConfig], stage: &str) -> anyhow::Result<HandlerChain> {
    let handlers = configs
        .iter()
        .enumerate()
        .map(|(index, config)| {
            config
                .build()
                .with_context(|| format!("Invalid {} handler #{}", stage, index + 1))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    tracing::debug!("Built {} {} handlers", handlers.len(), stage);
    Ok(HandlerChain::new(handlers))
}
