//! Filter on HTML content using CSS selectors

use crate::error::Result;
use crate::handler::{DocumentFilter, HandlerDoc, OnMatch, RestrictionConfig, Restrictions};
use crate::text::dom::{Extract, parse_selector, select_values};
use crate::text::pattern::{CachedRegex, MatchMode};
use scraper::Selector;
use serde::{Deserialize, Serialize};

fn default_extract() -> String {
    "text".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DomContentFilterConfig {
    pub selector: String,
    /// When set, an element only counts if its extracted value matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default = "default_extract")]
    pub extract: String,
    #[serde(default)]
    pub case_sensitive: bool,
    #[serde(default)]
    pub on_match: OnMatch,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl DomContentFilterConfig {
    pub fn new(selector: impl Into<String>, on_match: OnMatch) -> Self {
        Self {
            selector: selector.into(),
            pattern: None,
            extract: default_extract(),
            case_sensitive: false,
            on_match,
            restrictions: Vec::new(),
        }
    }
}

/// Matches when the selector finds at least one element, optionally
/// requiring its extracted value to match a pattern.
///
/// The content is parsed as a whole.
#[derive(Debug)]
pub struct DomContentFilter {
    config: DomContentFilterConfig,
    selector: Selector,
    extract: Extract,
    regex: Option<CachedRegex>,
    restrictions: Restrictions,
}

impl DomContentFilter {
    pub fn new(config: DomContentFilterConfig) -> Result<Self> {
        let regex = config
            .pattern
            .as_deref()
            .map(|p| CachedRegex::compiled(p, config.case_sensitive, MatchMode::Whole))
            .transpose()?;
        Ok(Self {
            selector: parse_selector(&config.selector)?,
            extract: Extract::parse_for("DomContentFilter", &config.extract)?,
            regex,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &DomContentFilterConfig {
        &self.config
    }
}

impl DocumentFilter for DomContentFilter {
    fn name(&self) -> &'static str {
        "DomContentFilter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn on_match(&self) -> OnMatch {
        self.config.on_match
    }

    fn is_document_matched(&self, doc: &mut HandlerDoc<'_>) -> Result<bool> {
        let html = doc.read_text(self.name())?;
        let values = select_values(&html, &self.selector, &self.extract);
        match &self.regex {
            None => Ok(!values.is_empty()),
            Some(regex) => {
                for value in &values {
                    if regex.is_match(value)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{accepts, assert_round_trip, meta};

    const HTML: &str = r#"<html><head><title>Sample</title></head>
<body><div class="content">Keep <b>this</b> one</div><span id="code">X-42</span></body></html>"#;

    #[test]
    fn test_selector_presence() {
        let filter = DomContentFilter::new(DomContentFilterConfig::new("div.content", OnMatch::Include)).unwrap();
        assert!(accepts(&filter, "ref", HTML, &meta(&[])));

        let filter = DomContentFilter::new(DomContentFilterConfig::new("table", OnMatch::Include)).unwrap();
        assert!(!accepts(&filter, "ref", HTML, &meta(&[])));
    }

    #[test]
    fn test_selected_value_must_match_pattern() {
        let mut config = DomContentFilterConfig::new("div.content", OnMatch::Exclude);
        config.pattern = Some("keep this.*".to_string());
        let filter = DomContentFilter::new(config).unwrap();
        assert!(!accepts(&filter, "ref", HTML, &meta(&[])));

        let mut config = DomContentFilterConfig::new("span", OnMatch::Include);
        config.pattern = Some("Y-.*".to_string());
        let filter = DomContentFilter::new(config).unwrap();
        assert!(!accepts(&filter, "ref", HTML, &meta(&[])));
    }

    #[test]
    fn test_extract_attribute() {
        let mut config = DomContentFilterConfig::new("span", OnMatch::Include);
        config.extract = "attr(id)".to_string();
        config.pattern = Some("code".to_string());
        config.case_sensitive = true;
        let filter = DomContentFilter::new(config).unwrap();
        assert!(accepts(&filter, "ref", HTML, &meta(&[])));
    }

    #[test]
    fn test_bad_configuration_fails_fast() {
        assert!(DomContentFilter::new(DomContentFilterConfig::new("div[", OnMatch::Include)).is_err());
        let mut config = DomContentFilterConfig::new("div", OnMatch::Include);
        config.extract = "colour".to_string();
        assert!(DomContentFilter::new(config).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = DomContentFilterConfig::new("a[href]", OnMatch::Include);
        config.extract = "attr(href)".to_string();
        config.pattern = Some("https://.*".to_string());
        assert_round_trip(&config);
    }
}
