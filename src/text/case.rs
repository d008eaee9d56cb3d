//! Character case conversions shared by the case tagger and transformer

use serde::{Deserialize, Serialize};

/// Supported case conversions.
///
/// The `*Fully` variants lower-case everything before capitalizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterCase {
    Upper,
    Lower,
    /// Capitalize the first letter of every word.
    Words,
    WordsFully,
    /// Capitalize the first letter of every sentence.
    Sentences,
    SentencesFully,
    /// Capitalize the first letter of the whole text.
    #[serde(rename = "string")]
    FirstLetter,
    #[serde(rename = "string-fully")]
    FirstLetterFully,
    /// Swap upper and lower case.
    Swap,
}

/// Word and sentence boundaries carried from one section of a text to the
/// next, so a conversion applied section by section matches a single pass.
#[derive(Debug, Clone, Copy)]
pub struct CaseState {
    word_start: bool,
    sentence_start: bool,
    after_sentence_end: bool,
    first_letter_pending: bool,
}

impl Default for CaseState {
    fn default() -> Self {
        Self {
            word_start: true,
            sentence_start: true,
            after_sentence_end: false,
            first_letter_pending: true,
        }
    }
}

impl CharacterCase {
    pub fn apply(self, text: &str) -> String {
        self.apply_continued(text, &mut CaseState::default())
    }

    /// Apply to the next section of a larger text, continuing from `state`.
    pub fn apply_continued(self, text: &str, state: &mut CaseState) -> String {
        match self {
            Self::Upper => text.to_uppercase(),
            Self::Lower => text.to_lowercase(),
            Self::Words => capitalize_words(text, state),
            Self::WordsFully => capitalize_words(&text.to_lowercase(), state),
            Self::Sentences => capitalize_sentences(text, state),
            Self::SentencesFully => capitalize_sentences(&text.to_lowercase(), state),
            Self::FirstLetter => capitalize_first(text, state),
            Self::FirstLetterFully => capitalize_first(&text.to_lowercase(), state),
            Self::Swap => swap_case(text),
        }
    }
}

fn capitalize_words(text: &str, state: &mut CaseState) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace() {
            state.word_start = true;
            out.push(c);
        } else if state.word_start {
            out.extend(c.to_uppercase());
            state.word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn capitalize_sentences(text: &str, state: &mut CaseState) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace() {
            if state.after_sentence_end {
                state.sentence_start = true;
                state.after_sentence_end = false;
            }
            out.push(c);
        } else if matches!(c, '.' | '?' | '!') {
            state.after_sentence_end = true;
            state.sentence_start = false;
            out.push(c);
        } else {
            state.after_sentence_end = false;
            if state.sentence_start {
                out.extend(c.to_uppercase());
                state.sentence_start = false;
            } else {
                out.push(c);
            }
        }
    }
    out
}

fn capitalize_first(text: &str, state: &mut CaseState) -> String {
    if !state.first_letter_pending {
        return text.to_string();
    }
    match text.char_indices().find(|(_, c)| !c.is_whitespace()) {
        Some((i, c)) => {
            state.first_letter_pending = false;
            let mut out = String::with_capacity(text.len());
            out.push_str(&text[..i]);
            out.extend(c.to_uppercase());
            out.push_str(&text[i + c.len_utf8()..]);
            out
        }
        None => text.to_string(),
    }
}

fn swap_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
