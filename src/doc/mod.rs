//! Document model
//!
//! A document is an opaque reference, a content body and ordered
//! multi-valued metadata. Handlers see documents through
//! [`crate::handler::HandlerDoc`]; this owned form is what the
//! [`crate::pipeline::HandlerChain`] keeps between handlers.

mod metadata;

pub use metadata::Metadata;

/// An owned document flowing through a handler chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub reference: String,
    pub content: Vec<u8>,
    pub metadata: Metadata,
}

impl Document {
    pub fn new(reference: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            reference: reference.into(),
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Content decoded as UTF-8, replacing invalid sequences.
    pub fn content_text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}
