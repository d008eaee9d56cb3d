//! Metadata taggers
//!
//! Taggers only ever change metadata. Those reading content consume it
//! without writing it back; the pipeline hands the next handler a fresh
//! reader.

pub mod case;
pub mod constant;
pub mod current_date;
pub mod date_format;
pub mod dom;
pub mod fields;
pub mod force_single;
pub mod language;
pub mod merge;
pub mod replace;
pub mod split;
pub mod text_between;
pub mod text_pattern;
pub mod text_statistics;

use crate::doc::Metadata;
use serde::{Deserialize, Serialize};

pub use case::{ApplyTo, CharacterCaseTagger, CharacterCaseTaggerConfig};
pub use constant::{ConstantTagger, ConstantTaggerConfig};
pub use current_date::{CurrentDateTagger, CurrentDateTaggerConfig};
pub use date_format::{DateFormatTagger, DateFormatTaggerConfig};
pub use dom::{DomTagger, DomTaggerConfig};
pub use fields::{
    CopyTagger, CopyTaggerConfig, DeleteTagger, DeleteTaggerConfig, KeepOnlyTagger, KeepOnlyTaggerConfig,
    RenameTagger, RenameTaggerConfig,
};
pub use force_single::{ForceSingleValueTagger, ForceSingleValueTaggerConfig, SingleValueAction};
pub use language::{LanguageTagger, LanguageTaggerConfig};
pub use merge::{MergeTagger, MergeTaggerConfig};
pub use replace::{FieldReplaceConfig, ReplaceTagger, ReplaceTaggerConfig};
pub use split::{SplitTagger, SplitTaggerConfig};
pub use text_between::{TextBetweenTagger, TextBetweenTaggerConfig};
pub use text_pattern::{TextPatternTagger, TextPatternTaggerConfig};
pub use text_statistics::{TextStatisticsTagger, TextStatisticsTaggerConfig};

/// What to do when a tagger writes to a field that already has values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnConflict {
    /// Append to the existing values.
    #[default]
    Add,
    Replace,
    /// Leave the existing values alone.
    Noop,
}

impl OnConflict {
    pub fn store<I, S>(self, metadata: &mut Metadata, field: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let conflict = !metadata.get(field).is_empty();
        match self {
            OnConflict::Noop if conflict => {
                tracing::debug!("Field {} already has values, leaving it as is", field);
            }
            OnConflict::Add if conflict => metadata.add_all(field, values),
            _ => metadata.set_all(field, values),
        }
    }
}

/// Write `values` to `field`, replacing existing values or appending to them.
pub(crate) fn store(metadata: &mut Metadata, field: &str, values: Vec<String>, overwrite: bool) {
    if overwrite {
        metadata.set_all(field, values);
    } else {
        metadata.add_all(field, values);
    }
}
