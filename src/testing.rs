//! Test helpers for driving handlers with in-memory documents

use crate::doc::{Document, Metadata};
use crate::handler::{DocumentFilter, DocumentSplitter, DocumentTagger, DocumentTransformer, HandlerDoc};

pub fn meta(pairs: &[(&str, &str)]) -> Metadata {
    pairs.iter().copied().collect()
}

pub fn accepts(filter: &dyn DocumentFilter, reference: &str, content: &str, metadata: &Metadata) -> bool {
    let mut metadata = metadata.clone();
    let mut input = content.as_bytes();
    let mut doc = HandlerDoc::new(reference, &mut input, &mut metadata, false);
    filter.accept_document(&mut doc).expect("filter should not fail")
}

pub fn tag(tagger: &dyn DocumentTagger, content: &str, metadata: &mut Metadata) {
    let mut input = content.as_bytes();
    let mut doc = HandlerDoc::new("test-ref", &mut input, metadata, false);
    tagger.tag_document(&mut doc).expect("tagger should not fail");
}

pub fn transform(transformer: &dyn DocumentTransformer, content: &str, metadata: &mut Metadata) -> String {
    let mut input = content.as_bytes();
    let mut output = Vec::new();
    let mut doc = HandlerDoc::new("test-ref", &mut input, metadata, true);
    transformer
        .transform_document(&mut doc, &mut output)
        .expect("transformer should not fail");
    String::from_utf8(output).expect("utf-8 output")
}

pub fn split(splitter: &dyn DocumentSplitter, reference: &str, content: &str, metadata: &mut Metadata) -> Vec<Document> {
    let mut input = content.as_bytes();
    let mut doc = HandlerDoc::new(reference, &mut input, metadata, false);
    splitter.split_document(&mut doc).expect("splitter should not fail")
}

/// Serialize `value` to TOML and JSON and read it back from both.
pub fn assert_round_trip<T>(value: &T)
where
    T: serde::Serialize + serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    let toml_text = toml::to_string(value).expect("serialize to toml");
    let from_toml: T = toml::from_str(&toml_text).expect("deserialize from toml");
    pretty_assertions::assert_eq!(&from_toml, value, "toml round trip:\n{toml_text}");

    let json_text = serde_json::to_string(value).expect("serialize to json");
    let from_json: T = serde_json::from_str(&json_text).expect("deserialize from json");
    pretty_assertions::assert_eq!(&from_json, value, "json round trip:\n{json_text}");
}
