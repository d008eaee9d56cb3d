//! Content transformers
//!
//! Transformers read the content section by section and write each rewritten
//! section to the output before reading the next one.

pub mod case;
pub mod reduce;
pub mod replace;
pub mod strip;
pub mod substring;

pub use case::{CharacterCaseTransformer, CharacterCaseTransformerConfig};
pub use reduce::{ReduceConsecutivesTransformer, ReduceConsecutivesTransformerConfig};
pub use replace::{ReplaceTransformer, ReplaceTransformerConfig};
pub use strip::{
    StripAfterTransformer, StripAfterTransformerConfig, StripBeforeTransformer, StripBeforeTransformerConfig,
    StripBetweenTransformer, StripBetweenTransformerConfig,
};
pub use substring::{SubstringTransformer, SubstringTransformerConfig};

use crate::text::reader::DEFAULT_MAX_READ_SIZE;

pub(crate) fn default_max_read_size() -> usize {
    DEFAULT_MAX_READ_SIZE
}
