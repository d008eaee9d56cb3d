//! Handler interfaces
//!
//! Every handler kind is a trait with a required primary method and a
//! provided entry point that applies the restriction gate first. The
//! pipeline only ever calls the provided entry points.

pub mod decision;
pub mod restriction;

use crate::doc::{Document, Metadata};
use crate::error::{ImporterError, Result};
use std::fmt;
use std::io::{Read, Write};

pub use decision::{OnMatch, accept};
pub use restriction::{Restriction, RestrictionConfig, Restrictions};

/// The view of a document handed to a handler.
pub struct HandlerDoc<'a> {
    pub reference: &'a str,
    /// Forward-only content. Pass `std::io::empty()` for documents without content.
    pub content: &'a mut dyn Read,
    pub metadata: &'a mut Metadata,
    /// Whether content is already extracted plain text.
    pub parsed: bool,
}

impl<'a> HandlerDoc<'a> {
    pub fn new(reference: &'a str, content: &'a mut dyn Read, metadata: &'a mut Metadata, parsed: bool) -> Self {
        Self {
            reference,
            content,
            metadata,
            parsed,
        }
    }

    /// Read the remaining content fully as text.
    pub fn read_text(&mut self, handler: &'static str) -> Result<String> {
        let mut bytes = Vec::new();
        self.content
            .read_to_end(&mut bytes)
            .map_err(|e| ImporterError::io(handler, self.reference, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// A handler deciding whether a document continues through the pipeline.
pub trait DocumentFilter: Send + Sync {
    fn name(&self) -> &'static str;

    fn restrictions(&self) -> &Restrictions;

    fn on_match(&self) -> OnMatch;

    /// The filter's predicate, evaluated only when the restrictions apply.
    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool>;

    /// Accept or reject `doc`. Documents outside the restrictions are accepted.
    fn accept_document(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        if !self.restrictions().is_applicable(doc.metadata)? {
            tracing::debug!("{} does not apply to {}, accepting", self.name(), doc.reference);
            return Ok(true);
        }
        let matched = self.is_document_matched(doc)?;
        let accepted = accept(matched, self.on_match());
        tracing::debug!(
            "{} {} {} (matched: {})",
            self.name(),
            if accepted { "accepted" } else { "rejected" },
            doc.reference,
            matched
        );
        Ok(accepted)
    }
}

/// A handler changing metadata only.
pub trait DocumentTagger: Send + Sync {
    fn name(&self) -> &'static str;

    fn restrictions(&self) -> &Restrictions;

    fn tag_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()>;

    /// Tag `doc` when the restrictions apply, leave it untouched otherwise.
    fn tag_document(&self, doc: &mut HandlerDoc<'_>) -> Result<()> {
        if !self.restrictions().is_applicable(doc.metadata)? {
            tracing::debug!("{} does not apply to {}, skipping", self.name(), doc.reference);
            return Ok(());
        }
        self.tag_applicable_document(doc)
    }
}

/// A handler rewriting content, and possibly metadata.
pub trait DocumentTransformer: Send + Sync {
    fn name(&self) -> &'static str;

    fn restrictions(&self) -> &Restrictions;

    fn transform_applicable_document(&self, doc: &mut HandlerDoc<'_>, output: &mut dyn Write) -> Result<()>;

    /// Transform `doc` into `output`. When the restrictions do not apply the
    /// content is copied unchanged.
    fn transform_document(&self, doc: &mut HandlerDoc<'_>, output: &mut dyn Write) -> Result<()> {
        if !self.restrictions().is_applicable(doc.metadata)? {
            tracing::debug!("{} does not apply to {}, copying content", self.name(), doc.reference);
            std::io::copy(doc.content, output).map_err(|e| ImporterError::io(self.name(), doc.reference, e))?;
            return Ok(());
        }
        self.transform_applicable_document(doc, output)
    }
}

/// A handler producing child documents out of one document.
pub trait DocumentSplitter: Send + Sync {
    fn name(&self) -> &'static str;

    fn restrictions(&self) -> &Restrictions;

    fn split_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<Vec<Document>>;

    /// Child documents of `doc`; none when the restrictions do not apply.
    fn split_document(&self, doc: &mut HandlerDoc<'_>) -> Result<Vec<Document>> {
        if !self.restrictions().is_applicable(doc.metadata)? {
            tracing::debug!("{} does not apply to {}, not splitting", self.name(), doc.reference);
            return Ok(Vec::new());
        }
        self.split_applicable_document(doc)
    }
}

/// Any handler, as held by a pipeline.
pub enum Handler {
    Filter(Box<dyn DocumentFilter>),
    Tagger(Box<dyn DocumentTagger>),
    Transformer(Box<dyn DocumentTransformer>),
    Splitter(Box<dyn DocumentSplitter>),
}

impl Handler {
    pub fn name(&self) -> &'static str {
        match self {
            Handler::Filter(h) => h.name(),
            Handler::Tagger(h) => h.name(),
            Handler::Transformer(h) => h.name(),
            Handler::Splitter(h) => h.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Handler::Filter(_) => "filter",
            Handler::Tagger(_) => "tagger",
            Handler::Transformer(_) => "transformer",
            Handler::Splitter(_) => "splitter",
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind())
            .field("name", &self.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{RegexContentFilter, RegexContentFilterConfig};
    use crate::testing::meta;
    use crate::text::CharacterCase;
    use crate::transformer::{CharacterCaseTransformer, CharacterCaseTransformerConfig};
    use std::io;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("device gone"))
        }
    }

    fn assert_io_error(error: ImporterError, expected_handler: &str) {
        match error {
            ImporterError::Io { handler, reference, .. } => {
                assert_eq!(handler, expected_handler);
                assert_eq!(reference, "doc-1");
            }
            other => panic!("expected an Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_transformer_surfaces_read_errors() {
        let transformer =
            CharacterCaseTransformer::new(CharacterCaseTransformerConfig::new(CharacterCase::Upper)).unwrap();
        let mut metadata = meta(&[]);
        let mut reader = FailingReader;
        let mut doc = HandlerDoc::new("doc-1", &mut reader, &mut metadata, true);
        let error = transformer.transform_document(&mut doc, &mut Vec::new()).unwrap_err();
        assert!(error.to_string().contains("CharacterCaseTransformer failed to read or write content of doc-1"));
        assert_io_error(error, "CharacterCaseTransformer");
    }

    #[test]
    fn test_restricted_transformer_surfaces_copy_errors() {
        let mut config = CharacterCaseTransformerConfig::new(CharacterCase::Upper);
        config.restrictions.push(RestrictionConfig::new("type", "text/html"));
        let transformer = CharacterCaseTransformer::new(config).unwrap();

        let mut metadata = meta(&[("type", "application/pdf")]);
        let mut reader = FailingReader;
        let mut doc = HandlerDoc::new("doc-1", &mut reader, &mut metadata, true);
        let error = transformer.transform_document(&mut doc, &mut Vec::new()).unwrap_err();
        assert_io_error(error, "CharacterCaseTransformer");
    }

    #[test]
    fn test_filter_surfaces_read_errors() {
        let filter = RegexContentFilter::new(RegexContentFilterConfig::new("x", OnMatch::Include)).unwrap();
        let mut metadata = meta(&[]);
        let mut reader = FailingReader;
        let mut doc = HandlerDoc::new("doc-1", &mut reader, &mut metadata, true);
        assert_io_error(filter.accept_document(&mut doc).unwrap_err(), "RegexContentFilter");
    }
}
