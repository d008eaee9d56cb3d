//! Include/exclude polarity of filters

use serde::{Deserialize, Serialize};

/// What a filter does with documents its predicate matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMatch {
    /// Keep matching documents.
    #[default]
    Include,
    /// Drop matching documents.
    Exclude,
}

/// Accept/reject outcome for one document: `matched XOR exclude`.
pub fn accept(matched: bool, on_match: OnMatch) -> bool {
    matched != (on_match == OnMatch::Exclude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polarity_truth_table() {
        assert!(accept(true, OnMatch::Include));
        assert!(!accept(false, OnMatch::Include));
        assert!(!accept(true, OnMatch::Exclude));
        assert!(accept(false, OnMatch::Exclude));
    }
}
