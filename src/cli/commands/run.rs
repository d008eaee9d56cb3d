use crate::cli::Output;
use crate::config::ImporterConfig;
use crate::doc::{Document, Metadata};
use crate::pipeline::ImportResponse;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct RunArgs {
    /// Document to import
    pub file: PathBuf,

    /// Reference given to handlers instead of the file path
    #[arg(long)]
    pub reference: Option<String>,

    /// Initial metadata value (repeatable)
    #[arg(short, long = "meta", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub meta: Vec<(String, String)>,

    /// Write the resulting content to FILE
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

fn parse_key_value(arg: &str) -> std::result::Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{arg}'")),
    }
}

#[derive(Serialize)]
struct DocumentReport<'a> {
    reference: &'a str,
    metadata: &'a Metadata,
    content: String,
}

impl<'a> DocumentReport<'a> {
    fn new(document: &'a Document) -> Self {
        Self {
            reference: &document.reference,
            metadata: &document.metadata,
            content: document.content_text(),
        }
    }
}

#[derive(Serialize)]
struct ImportReport<'a> {
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection: Option<String>,
    #[serde(flatten)]
    document: DocumentReport<'a>,
    children: Vec<DocumentReport<'a>>,
}

pub fn execute(args: RunArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = ImporterConfig::load_with_custom_config(custom_config)?;
    let importer = config.build().context("Invalid configuration")?;
    output.verbose(&format!(
        "Loaded {} handlers ({} pre-parse, {} post-parse)",
        config.handler_count(),
        importer.pre_parse().len(),
        importer.post_parse().len()
    ));

    let content = std::fs::read(&args.file).with_context(|| format!("Failed to read {}", args.file.display()))?;
    let reference = args
        .reference
        .unwrap_or_else(|| args.file.display().to_string());
    let metadata: Metadata = args.meta.into_iter().collect();
    let document = Document::new(reference, content).with_metadata(metadata);

    let response = importer
        .import(document)
        .with_context(|| format!("Failed to import {}", args.file.display()))?;

    if let Some(path) = &args.output {
        std::fs::write(path, &response.document.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        output.info(&format!("Content written to {}", path.display()));
    }

    match args.format {
        ReportFormat::Json => print_json(&response)?,
        ReportFormat::Text => print_text(&response, args.output.is_none(), output),
    }

    match &response.rejection {
        None => output.success(&format!("Accepted {}", response.document.reference)),
        Some(rejection) => output.warning(&format!("Rejected {}: {}", response.document.reference, rejection)),
    }
    Ok(())
}

fn print_json(response: &ImportResponse) -> Result<()> {
    let report = ImportReport {
        accepted: response.is_accepted(),
        rejection: response.rejection.map(|r| r.to_string()),
        document: DocumentReport::new(&response.document),
        children: response.children.iter().map(DocumentReport::new).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_text(response: &ImportResponse, with_content: bool, output: &Output) {
    let reason = response.rejection.map(|r| r.to_string());
    output.verdict(response.is_accepted(), reason.as_deref());
    print_document(&response.document, with_content, output);

    if !response.children.is_empty() {
        output.section(&format!("Children ({})", response.children.len()));
        for child in &response.children {
            output.child(&child.reference);
            for (field, values) in child.metadata.iter() {
                output.field(1, field, values);
            }
        }
    }
}

fn print_document(document: &Document, with_content: bool, output: &Output) {
    output.reference(&document.reference);

    output.section("Metadata");
    for (field, values) in document.metadata.iter() {
        output.field(0, field, values);
    }

    if with_content {
        output.section("Content");
        println!("{}", document.content_text());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(parse_key_value("a=b=c").unwrap(), ("a".to_string(), "b=c".to_string()));
        assert_eq!(parse_key_value("title=").unwrap(), ("title".to_string(), String::new()));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }
}
