//! Regex compilation and the per-handler compiled pattern cache

use crate::error::{ImporterError, Result};
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// How a pattern is applied to a target string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The pattern must match the whole target.
    Whole,
    /// The pattern may match anywhere in the target.
    Find,
}

/// Compile `pattern` with dot-matches-newline enabled.
///
/// `Whole` mode anchors the pattern at both ends of the input (not of each
/// line).
pub fn compile(pattern: &str, case_sensitive: bool, mode: MatchMode) -> Result<Regex> {
    let source = match mode {
        MatchMode::Whole => format!("^(?:{pattern})$"),
        MatchMode::Find => pattern.to_string(),
    };
    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| ImporterError::Regex {
            pattern: pattern.to_string(),
            source: Box::new(source),
        })
}

/// A regex compiled on first use and reused afterwards.
///
/// The cache is dropped whenever the pattern or case sensitivity changes.
/// Concurrent first use may compile more than once; only one result is kept.
#[derive(Debug, Clone)]
pub struct CachedRegex {
    pattern: String,
    case_sensitive: bool,
    mode: MatchMode,
    compiled: OnceLock<Regex>,
}

impl CachedRegex {
    pub fn new(pattern: impl Into<String>, case_sensitive: bool, mode: MatchMode) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive,
            mode,
            compiled: OnceLock::new(),
        }
    }

    /// Build and compile immediately so invalid patterns fail at construction.
    pub fn compiled(pattern: impl Into<String>, case_sensitive: bool, mode: MatchMode) -> Result<Self> {
        let cached = Self::new(pattern, case_sensitive, mode);
        cached.regex()?;
        Ok(cached)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
        self.compiled = OnceLock::new();
    }

    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        if self.case_sensitive != case_sensitive {
            self.case_sensitive = case_sensitive;
            self.compiled = OnceLock::new();
        }
    }

    /// The compiled regex, compiling it on first call.
    pub fn regex(&self) -> Result<&Regex> {
        if let Some(regex) = self.compiled.get() {
            return Ok(regex);
        }
        let regex = compile(&self.pattern, self.case_sensitive, self.mode)?;
        Ok(self.compiled.get_or_init(|| regex))
    }

    pub fn is_match(&self, text: &str) -> Result<bool> {
        Ok(self.regex()?.is_match(text))
    }
}

impl PartialEq for CachedRegex {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
            && self.case_sensitive == other.case_sensitive
            && self.mode == other.mode
    }
}

/// Escape a literal so it can be embedded in a pattern.
pub fn literal(text: &str) -> String {
    regex::escape(text)
}
