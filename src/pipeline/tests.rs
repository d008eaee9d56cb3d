use super::*;
use crate::config::{HandlerConfig, ImporterConfig};
use crate::filter::{ReferenceFilterConfig, RegexContentFilterConfig, RegexMetadataFilterConfig};
use crate::handler::RestrictionConfig;
use crate::splitter::{CsvSplitterConfig, PARENT_REFERENCE_FIELD};
use crate::tagger::{ConstantTaggerConfig, TextPatternTaggerConfig};
use crate::testing::meta;
use crate::text::replace::ReplaceConfig;
use crate::transformer::ReplaceTransformerConfig;
use indexmap::IndexMap;
use pretty_assertions::assert_eq;

fn chain(configs: Vec<HandlerConfig>) -> HandlerChain {
    HandlerChain::new(configs.iter().map(|c| c.build().unwrap()).collect())
}

fn constant(field: &str, value: &str) -> HandlerConfig {
    let mut constants = IndexMap::new();
    constants.insert(field.to_string(), vec![value.to_string()]);
    HandlerConfig::ConstantTagger(ConstantTaggerConfig {
        constants,
        ..Default::default()
    })
}

fn include_reference(pattern: &str) -> HandlerConfig {
    HandlerConfig::ReferenceFilter(ReferenceFilterConfig::new(pattern, OnMatch::Include))
}

fn replace(from: &str, to: &str) -> HandlerConfig {
    HandlerConfig::ReplaceTransformer(ReplaceTransformerConfig::new(vec![ReplaceConfig::literal(from, to)]))
}

#[test]
fn test_empty_chain_accepts() {
    let mut doc = Document::new("a.txt", "hello");
    let outcome = chain(vec![]).run(&mut doc, false).unwrap();
    assert_eq!(outcome.rejection, None);
    assert!(outcome.children.is_empty());
    assert_eq!(doc.content, b"hello");
}

#[test]
fn test_exclude_stops_the_chain() {
    let handlers = chain(vec![
        HandlerConfig::ReferenceFilter(ReferenceFilterConfig::new(".*\\.tmp", OnMatch::Exclude)),
        constant("seen", "yes"),
    ]);

    let mut doc = Document::new("draft.tmp", "");
    let outcome = handlers.run(&mut doc, false).unwrap();
    assert_eq!(outcome.rejection, Some(Rejection::Excluded { filter: "ReferenceFilter" }));
    assert!(!doc.metadata.contains("seen"));

    let mut doc = Document::new("final.txt", "");
    assert_eq!(handlers.run(&mut doc, false).unwrap().rejection, None);
    assert_eq!(doc.metadata.first("seen"), Some("yes"));
}

#[test]
fn test_any_include_is_enough() {
    let handlers = chain(vec![include_reference(".*\\.pdf"), include_reference(".*\\.html")]);

    for (reference, accepted) in [("a.pdf", true), ("b.html", true), ("c.txt", false)] {
        let mut doc = Document::new(reference, "");
        let outcome = handlers.run(&mut doc, false).unwrap();
        assert_eq!(outcome.rejection.is_none(), accepted, "{reference}");
    }
}

#[test]
fn test_unmatched_includes_reject_at_end_of_chain() {
    let handlers = chain(vec![include_reference(".*\\.pdf"), constant("seen", "yes")]);
    let mut doc = Document::new("c.txt", "");
    let outcome = handlers.run(&mut doc, false).unwrap();
    assert_eq!(outcome.rejection, Some(Rejection::NotIncluded));
    // Include filters do not stop the chain early
    assert_eq!(doc.metadata.first("seen"), Some("yes"));
}

#[test]
fn test_restricted_include_counts_as_matched() {
    let mut filter = ReferenceFilterConfig::new(".*\\.pdf", OnMatch::Include);
    filter.restrictions.push(RestrictionConfig::new("type", "application/pdf"));
    let handlers = chain(vec![HandlerConfig::ReferenceFilter(filter)]);

    let mut doc = Document::new("c.txt", "").with_metadata(meta(&[("type", "text/plain")]));
    assert_eq!(handlers.run(&mut doc, false).unwrap().rejection, None);

    let mut doc = Document::new("c.txt", "").with_metadata(meta(&[("type", "application/pdf")]));
    assert_eq!(handlers.run(&mut doc, false).unwrap().rejection, Some(Rejection::NotIncluded));
}

#[test]
fn test_later_handlers_see_transformed_content() {
    let handlers = chain(vec![
        replace("secret", "public"),
        HandlerConfig::RegexContentFilter(RegexContentFilterConfig::new(".*secret.*", OnMatch::Exclude)),
        HandlerConfig::TextPatternTagger(TextPatternTaggerConfig::new("word", "pub\\w+")),
    ]);
    let mut doc = Document::new("a.txt", "a secret note");
    let outcome = handlers.run(&mut doc, true).unwrap();
    assert_eq!(outcome.rejection, None);
    assert_eq!(doc.content_text(), "a public note");
    assert_eq!(doc.metadata.get("word"), ["public"]);
}

#[test]
fn test_splitter_children_are_collected() {
    let handlers = chain(vec![HandlerConfig::CsvSplitter(CsvSplitterConfig {
        use_first_row_as_fields: true,
        ..Default::default()
    })]);
    let mut doc = Document::new("people.csv", "name,age\nAda,36\nAlan,41\n");
    let outcome = handlers.run(&mut doc, false).unwrap();
    assert_eq!(outcome.children.len(), 2);
    assert_eq!(outcome.children[1].metadata.first("name"), Some("Alan"));
    assert_eq!(outcome.children[0].metadata.first(PARENT_REFERENCE_FIELD), Some("people.csv"));
}

#[test]
fn test_rejection_drops_children() {
    let handlers = chain(vec![
        HandlerConfig::CsvSplitter(CsvSplitterConfig::default()),
        include_reference(".*\\.tsv"),
    ]);
    let mut doc = Document::new("people.csv", "Ada,36\n");
    let outcome = handlers.run(&mut doc, false).unwrap();
    assert_eq!(outcome.rejection, Some(Rejection::NotIncluded));
    assert!(outcome.children.is_empty());
}

#[test]
fn test_import_runs_both_stages() {
    let config = ImporterConfig {
        max_read_size: 8,
        pre_parse_handlers: vec![constant("stage", "pre")],
        post_parse_handlers: vec![
            HandlerConfig::RegexMetadataFilter(RegexMetadataFilterConfig::new("stage", "pre", OnMatch::Include)),
            replace("\u{FFFD}", "?"),
        ],
    };
    let importer = config.build().unwrap();

    let response = importer
        .import(Document::new("a.bin", b"bad \xff byte in a longer text".to_vec()))
        .unwrap();
    assert!(response.is_accepted());
    assert_eq!(response.document.content_text(), "bad ? byte in a longer text");
    assert!(response.children.is_empty());
}

#[test]
fn test_import_rejected_before_parsing_skips_post_parse() {
    let config = ImporterConfig {
        pre_parse_handlers: vec![HandlerConfig::ReferenceFilter(ReferenceFilterConfig::new(
            ".*\\.bin",
            OnMatch::Exclude,
        ))],
        post_parse_handlers: vec![constant("seen", "yes")],
        ..ImporterConfig::default()
    };
    let response = config.build().unwrap().import(Document::new("a.bin", "x")).unwrap();
    assert!(!response.is_accepted());
    assert!(!response.document.metadata.contains("seen"));
    assert_eq!(response.rejection.unwrap().to_string(), "excluded by ReferenceFilter");
}
