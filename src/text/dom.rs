//! CSS selector extraction over HTML content

use crate::error::{ImporterError, Result};
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use std::str::FromStr;

/// What to extract from each selected element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Extract {
    /// Text of the element and its descendants, whitespace normalized.
    #[default]
    Text,
    /// Inner HTML.
    Html,
    /// HTML including the element itself.
    OuterHtml,
    /// Text of the element's direct text children only.
    OwnText,
    TagName,
    Id,
    ClassName,
    /// Value of the named attribute, written `attr(name)`.
    Attr(String),
}

impl FromStr for Extract {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(name) = trimmed
            .strip_prefix("attr(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let name = name.trim();
            if name.is_empty() {
                return Err("attr() needs an attribute name".to_string());
            }
            return Ok(Extract::Attr(name.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "text" => Ok(Extract::Text),
            "html" => Ok(Extract::Html),
            "outerhtml" | "outer-html" => Ok(Extract::OuterHtml),
            "owntext" | "own-text" => Ok(Extract::OwnText),
            "tagname" | "tag-name" => Ok(Extract::TagName),
            "id" => Ok(Extract::Id),
            "classname" | "class-name" => Ok(Extract::ClassName),
            other => Err(format!("unknown extract option `{other}`")),
        }
    }
}

impl fmt::Display for Extract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extract::Text => write!(f, "text"),
            Extract::Html => write!(f, "html"),
            Extract::OuterHtml => write!(f, "outer-html"),
            Extract::OwnText => write!(f, "own-text"),
            Extract::TagName => write!(f, "tag-name"),
            Extract::Id => write!(f, "id"),
            Extract::ClassName => write!(f, "class-name"),
            Extract::Attr(name) => write!(f, "attr({name})"),
        }
    }
}

impl Extract {
    pub fn parse_for(handler: &'static str, text: &str) -> Result<Self> {
        text.parse().map_err(|message| ImporterError::config(handler, message))
    }

    /// Value of this extract on `element`, `None` when the element lacks it.
    pub fn apply(&self, element: ElementRef<'_>) -> Option<String> {
        match self {
            Extract::Text => Some(normalize_whitespace(&element.text().collect::<String>())),
            Extract::Html => Some(element.inner_html()),
            Extract::OuterHtml => Some(element.html()),
            Extract::OwnText => {
                let own: String = element
                    .children()
                    .filter_map(|node| node.value().as_text().map(|t| &**t))
                    .collect();
                Some(normalize_whitespace(&own))
            }
            Extract::TagName => Some(element.value().name().to_string()),
            Extract::Id => element.value().id().map(str::to_string),
            Extract::ClassName => element.value().attr("class").map(str::to_string),
            Extract::Attr(name) => element.value().attr(name).map(str::to_string),
        }
    }
}

/// Parse a CSS selector, reporting failures as configuration errors.
pub fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ImporterError::Selector {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Extracted values of every element matching `selector`, in document order.
pub fn select_values(html: &str, selector: &Selector, extract: &Extract) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .filter_map(|element| extract.apply(element))
        .collect()
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>Sample</title></head>
        <body>
          <div id="main" class="content wide">Intro <b>bold</b>
             text</div>
          <a href="/one">One</a><a href="/two">Two</a>
        </body></html>"#;

    #[test]
    fn test_extract_options() {
        let div = parse_selector("div#main").unwrap();
        assert_eq!(select_values(PAGE, &div, &Extract::Text), vec!["Intro bold text"]);
        assert_eq!(select_values(PAGE, &div, &Extract::OwnText), vec!["Intro text"]);
        assert_eq!(select_values(PAGE, &div, &Extract::Id), vec!["main"]);
        assert_eq!(select_values(PAGE, &div, &Extract::ClassName), vec!["content wide"]);
        assert_eq!(select_values(PAGE, &div, &Extract::TagName), vec!["div"]);
        assert!(select_values(PAGE, &div, &Extract::Html)[0].contains("<b>bold</b>"));
        assert!(select_values(PAGE, &div, &Extract::OuterHtml)[0].starts_with("<div"));
    }

    #[test]
    fn test_attribute_extract_skips_missing() {
        let links = parse_selector("a, title").unwrap();
        let hrefs = select_values(PAGE, &links, &Extract::Attr("href".to_string()));
        assert_eq!(hrefs, vec!["/one", "/two"]);
    }

    #[test]
    fn test_extract_parsing() {
        assert_eq!("".parse::<Extract>().unwrap(), Extract::Text);
        assert_eq!("outerHtml".parse::<Extract>().unwrap(), Extract::OuterHtml);
        assert_eq!(
            "attr(data-x)".parse::<Extract>().unwrap(),
            Extract::Attr("data-x".to_string())
        );
        assert!("attr()".parse::<Extract>().is_err());
        assert!("bogus".parse::<Extract>().is_err());
        assert_eq!(Extract::Attr("href".into()).to_string(), "attr(href)");
    }

    #[test]
    fn test_bad_selector() {
        assert!(parse_selector("div[").is_err());
    }
}
