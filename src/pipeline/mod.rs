//! Running documents through handlers
//!
//! A [`HandlerChain`] applies handlers in order to one owned [`Document`].
//! Filters are aggregated per chain: an exclude filter rejects on the spot,
//! include filters only reject when the chain ends and none of them matched.
//! An [`Importer`] runs the pre-parse chain, decodes the content as text, then
//! runs the post-parse chain.

use crate::doc::Document;
use crate::error::Result;
use crate::handler::{Handler, HandlerDoc, OnMatch};
use crate::text::reader::for_each_text_section;
use std::ops::ControlFlow;

/// Why a document was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// An exclude filter matched.
    Excluded { filter: &'static str },
    /// The chain has include filters and none of them matched.
    NotIncluded,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::Excluded { filter } => write!(f, "excluded by {filter}"),
            Rejection::NotIncluded => write!(f, "not matched by any include filter"),
        }
    }
}

/// Result of running one chain.
#[derive(Debug, Default)]
pub struct ChainOutcome {
    pub rejection: Option<Rejection>,
    /// Documents produced by splitters, in order.
    pub children: Vec<Document>,
}

#[derive(Debug, Default)]
pub struct HandlerChain {
    handlers: Vec<Handler>,
}

impl HandlerChain {
    pub fn new(handlers: Vec<Handler>) -> Self {
        Self { handlers }
    }

    pub fn handlers(&self) -> &[Handler] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run every handler on `document`, stopping at the first exclusion.
    ///
    /// Transformers replace the document content. Children produced before
    /// a rejection are dropped.
    pub fn run(&self, document: &mut Document, parsed: bool) -> Result<ChainOutcome> {
        let mut outcome = ChainOutcome::default();
        let mut has_includes = false;
        let mut included = false;

        for handler in &self.handlers {
            let mut content: &[u8] = &document.content;
            let mut doc = HandlerDoc::new(&document.reference, &mut content, &mut document.metadata, parsed);

            match handler {
                Handler::Filter(filter) => {
                    let accepted = filter.accept_document(&mut doc)?;
                    match filter.on_match() {
                        OnMatch::Include => {
                            has_includes = true;
                            included |= accepted;
                        }
                        OnMatch::Exclude if !accepted => {
                            tracing::debug!("{} rejected by {}", document.reference, filter.name());
                            return Ok(ChainOutcome {
                                rejection: Some(Rejection::Excluded { filter: filter.name() }),
                                children: Vec::new(),
                            });
                        }
                        OnMatch::Exclude => {}
                    }
                }
                Handler::Tagger(tagger) => tagger.tag_document(&mut doc)?,
                Handler::Transformer(transformer) => {
                    let mut output = Vec::with_capacity(document.content.len());
                    transformer.transform_document(&mut doc, &mut output)?;
                    document.content = output;
                }
                Handler::Splitter(splitter) => {
                    let children = splitter.split_document(&mut doc)?;
                    tracing::debug!(
                        "{} produced {} children of {}",
                        splitter.name(),
                        children.len(),
                        document.reference
                    );
                    outcome.children.extend(children);
                }
            }
        }

        if has_includes && !included {
            tracing::debug!("{} matched no include filter", document.reference);
            outcome.rejection = Some(Rejection::NotIncluded);
            outcome.children.clear();
        }
        Ok(outcome)
    }
}

/// Outcome of importing one document.
#[derive(Debug)]
pub struct ImportResponse {
    pub document: Document,
    pub rejection: Option<Rejection>,
    pub children: Vec<Document>,
}

impl ImportResponse {
    pub fn is_accepted(&self) -> bool {
        self.rejection.is_none()
    }
}

/// Pre-parse handlers, content decoding, post-parse handlers.
#[derive(Debug)]
pub struct Importer {
    max_read_size: usize,
    pre_parse: HandlerChain,
    post_parse: HandlerChain,
}

impl Importer {
    pub fn new(max_read_size: usize, pre_parse: HandlerChain, post_parse: HandlerChain) -> Self {
        Self {
            max_read_size,
            pre_parse,
            post_parse,
        }
    }

    pub fn pre_parse(&self) -> &HandlerChain {
        &self.pre_parse
    }

    pub fn post_parse(&self) -> &HandlerChain {
        &self.post_parse
    }

    pub fn import(&self, mut document: Document) -> Result<ImportResponse> {
        tracing::info!("Importing {}", document.reference);

        let pre = self.pre_parse.run(&mut document, false)?;
        if let Some(rejection) = pre.rejection {
            tracing::info!("Rejected {} before parsing: {}", document.reference, rejection);
            return Ok(ImportResponse {
                document,
                rejection: Some(rejection),
                children: Vec::new(),
            });
        }

        self.parse(&mut document)?;

        let post = self.post_parse.run(&mut document, true)?;
        if let Some(rejection) = post.rejection {
            tracing::info!("Rejected {} after parsing: {}", document.reference, rejection);
            return Ok(ImportResponse {
                document,
                rejection: Some(rejection),
                children: Vec::new(),
            });
        }

        let mut children = pre.children;
        children.extend(post.children);
        tracing::info!("Imported {} ({} children)", document.reference, children.len());
        Ok(ImportResponse {
            document,
            rejection: None,
            children,
        })
    }

    /// Decode the content as UTF-8 text, one bounded section at a time.
    fn parse(&self, document: &mut Document) -> Result<()> {
        let mut text = String::with_capacity(document.content.len());
        let mut input: &[u8] = &document.content;
        for_each_text_section("Importer", &document.reference, &mut input, self.max_read_size, |section, _| {
            text.push_str(section);
            Ok(ControlFlow::Continue(()))
        })?;
        if text.len() != document.content.len() {
            tracing::debug!("Replaced invalid UTF-8 in {}", document.reference);
        }
        document.content = text.into_bytes();
        Ok(())
    }
}

#[cfg(test)]
mod tests;
