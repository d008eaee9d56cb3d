//! Text utilities shared by handlers
//!
//! Pattern compilation, chunked reading, field resolution, case changes,
//! dates, replacements and DOM extraction.

pub mod case;
pub mod dates;
pub mod dom;
pub mod fields;
pub mod pattern;
pub mod reader;
pub mod replace;

pub use case::CharacterCase;
pub use fields::{FieldMatcher, FieldMatcherConfig};
pub use pattern::{CachedRegex, MatchMode};
pub use reader::{DEFAULT_MAX_READ_SIZE, TextReader, for_each_text_section, transform_text_sections};

/// True when `text` holds nothing but whitespace or control characters.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c.is_control())
}
