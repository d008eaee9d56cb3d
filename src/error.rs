//! Error type shared by every handler.

use thiserror::Error;

/// Errors raised while building or running handlers.
///
/// Configuration problems (`Config`, `Regex`, `Selector`, `DateFormat`) are
/// raised at construction time. `Io` and `Handler` are raised while
/// processing a single document and surface to the pipeline driver.
#[derive(Debug, Error)]
pub enum ImporterError {
    #[error("invalid {handler} configuration: {message}")]
    Config {
        handler: &'static str,
        message: String,
    },
    #[error("invalid regex pattern `{pattern}`: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
    #[error("invalid CSS selector `{selector}`: {message}")]
    Selector { selector: String, message: String },
    #[error("invalid date format `{format}`")]
    DateFormat { format: String },
    #[error("{handler} failed to read or write content of {reference}: {source}")]
    Io {
        handler: &'static str,
        reference: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{handler} failed on {reference}: {message}")]
    Handler {
        handler: &'static str,
        reference: String,
        message: String,
    },
}

impl ImporterError {
    pub fn config(handler: &'static str, message: impl Into<String>) -> Self {
        Self::Config {
            handler,
            message: message.into(),
        }
    }

    pub fn io(handler: &'static str, reference: &str, source: std::io::Error) -> Self {
        Self::Io {
            handler,
            reference: reference.to_string(),
            source,
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ImporterError>;
