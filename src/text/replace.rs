//! Literal and regex replacements shared by the replace tagger and transformer

use crate::error::Result;
use crate::text::pattern::{MatchMode, compile, literal};
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

fn default_replace_all() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ReplaceConfig {
    pub from: String,
    #[serde(default)]
    pub to: String,
    /// Treat `from` as a regex; `to` may then refer to groups (`$1`).
    #[serde(default)]
    pub regex: bool,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Replace every occurrence rather than the first one only.
    #[serde(default = "default_replace_all")]
    pub replace_all: bool,
}

impl ReplaceConfig {
    pub fn literal(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            regex: false,
            case_sensitive: false,
            replace_all: true,
        }
    }

    pub fn regex(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            regex: true,
            ..Self::literal(from, to)
        }
    }
}

/// A compiled [`ReplaceConfig`].
#[derive(Debug, Clone)]
pub struct Replacer {
    regex: Regex,
    to: String,
    expand: bool,
    all: bool,
}

impl Replacer {
    pub fn new(config: &ReplaceConfig) -> Result<Self> {
        let pattern = if config.regex {
            config.from.clone()
        } else {
            literal(&config.from)
        };
        Ok(Self {
            regex: compile(&pattern, config.case_sensitive, MatchMode::Find)?,
            to: config.to.clone(),
            expand: config.regex,
            all: config.replace_all,
        })
    }

    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        let limit = if self.all { 0 } else { 1 };
        if self.expand {
            self.regex.replacen(text, limit, self.to.as_str())
        } else {
            self.regex.replacen(text, limit, NoExpand(&self.to))
        }
    }
}
