//! # docsift - pluggable document handlers
//!
//! Building blocks for content-import pipelines: filters that accept or reject
//! documents, taggers that rewrite metadata, transformers that rewrite content
//! and splitters that produce child documents.
//!
//! Every handler shares the same plumbing:
//!
//! - **Restrictions**: optional metadata regex checks gating whether a handler
//!   applies to a document at all
//! - **Polarity**: filters either include or exclude what they match
//! - **Sections**: text content is processed in bounded sections cut at
//!   paragraph, sentence or word boundaries
//! - **Field matchers**: taggers resolve the metadata fields they act on by
//!   name or regex
//!
//! ## Quick Start
//!
//! ```bash
//! # Check a configuration
//! docsift --config docsift.toml config validate
//!
//! # Run a file through it
//! docsift --config docsift.toml run report.txt --meta type=text/plain
//! ```

pub mod cli;
pub mod config;
pub mod doc;
pub mod error;
pub mod filter;
pub mod handler;
pub mod pipeline;
pub mod splitter;
pub mod tagger;
pub mod text;
pub mod transformer;

#[cfg(test)]
mod testing;

pub use config::{HandlerConfig, ImporterConfig};
pub use doc::{Document, Metadata};
pub use error::{ImporterError, Result};
pub use handler::{DocumentFilter, DocumentSplitter, DocumentTagger, DocumentTransformer, Handler, HandlerDoc};
pub use pipeline::{HandlerChain, ImportResponse, Importer, Rejection};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
