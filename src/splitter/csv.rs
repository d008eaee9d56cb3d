//! Split CSV content into one document per row

use crate::doc::{Document, Metadata};
use crate::error::{ImporterError, Result};
use crate::handler::{DocumentSplitter, HandlerDoc, RestrictionConfig, Restrictions};
use csv::{ByteRecord, ReaderBuilder};
use serde::{Deserialize, Serialize};

/// Field holding the reference of the document a child was split from.
pub const PARENT_REFERENCE_FIELD: &str = "docsift.parent-reference";

fn default_separator() -> char {
    ','
}

fn default_quote() -> char {
    '"'
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CsvSplitterConfig {
    #[serde(default = "default_separator")]
    pub separator: char,
    #[serde(default = "default_quote")]
    pub quote: char,
    /// Escapes quotes inside quoted cells instead of doubling them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escape: Option<char>,
    /// Name fields after the first row instead of `field1`, `field2`...
    #[serde(default)]
    pub use_first_row_as_fields: bool,
    /// Rows dropped before anything else, header included.
    #[serde(default)]
    pub lines_to_skip: usize,
    /// Column (name or 1-based position) whose value completes child references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_column: Option<String>,
    /// Columns (names or 1-based positions) joined into the child content.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_columns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub restrictions: Vec<RestrictionConfig>,
}

impl Default for CsvSplitterConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            quote: default_quote(),
            escape: None,
            use_first_row_as_fields: false,
            lines_to_skip: 0,
            reference_column: None,
            content_columns: Vec::new(),
            restrictions: Vec::new(),
        }
    }
}

/// Turns every CSV row into a child document carrying the row's cells as
/// metadata. Children are referenced `{parent}!{value}` where the value comes
/// from `reference_column`, or is the row number.
#[derive(Debug)]
pub struct CsvSplitter {
    config: CsvSplitterConfig,
    delimiter: u8,
    quote: u8,
    escape: Option<u8>,
    restrictions: Restrictions,
}

/// Cell delimiters must be single ASCII characters other than line breaks.
fn delimiter_byte(name: &str, c: char) -> Result<u8> {
    match u8::try_from(c) {
        Ok(b) if b.is_ascii() && b != b'\n' && b != b'\r' => Ok(b),
        _ => Err(ImporterError::config(
            "CsvSplitter",
            format!("{name} `{}` must be a single ASCII character other than a line break", c.escape_default()),
        )),
    }
}

impl CsvSplitter {
    pub fn new(config: CsvSplitterConfig) -> Result<Self> {
        let delimiter = delimiter_byte("separator", config.separator)?;
        let quote = delimiter_byte("quote", config.quote)?;
        let escape = config.escape.map(|c| delimiter_byte("escape", c)).transpose()?;
        if delimiter == quote || escape == Some(delimiter) {
            return Err(ImporterError::config(
                "CsvSplitter",
                "separator, quote and escape must be different characters",
            ));
        }
        Ok(Self {
            delimiter,
            quote,
            escape,
            restrictions: Restrictions::new(&config.restrictions)?,
            config,
        })
    }

    pub fn config(&self) -> &CsvSplitterConfig {
        &self.config
    }

    fn read_error(&self, reference: &str, error: csv::Error) -> ImporterError {
        match error.into_kind() {
            csv::ErrorKind::Io(source) => ImporterError::io(self.name(), reference, source),
            other => ImporterError::Handler {
                handler: self.name(),
                reference: reference.to_string(),
                message: format!("{other:?}"),
            },
        }
    }

    fn column_index(&self, column: &str, fields: &[String]) -> Option<usize> {
        fields.iter().position(|f| f == column).or_else(|| {
            column
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .filter(|&i| i < fields.len())
        })
    }
}

impl DocumentSplitter for CsvSplitter {
    fn name(&self) -> &'static str {
        "CsvSplitter"
    }

    fn restrictions(&self) -> &Restrictions {
        &self.restrictions
    }

    fn split_applicable_document(&self, doc: &mut HandlerDoc<'_>) -> Result<Vec<Document>> {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .quote(self.quote)
            .escape(self.escape)
            .double_quote(self.escape.is_none())
            .from_reader(&mut *doc.content);
        let reference = doc.reference;
        let mut rows = reader
            .into_byte_records()
            .map(|record| record.map(cells).map_err(|e| self.read_error(reference, e)))
            .skip(self.config.lines_to_skip);

        let header = if self.config.use_first_row_as_fields {
            rows.next().transpose()?
        } else {
            None
        };

        let mut children = Vec::new();
        for (row_number, row) in rows.enumerate().map(|(i, row)| (i + 1, row)) {
            let row = row?;
            let fields: Vec<String> = (0..row.len())
                .map(|i| {
                    header
                        .as_ref()
                        .and_then(|h| h.get(i))
                        .filter(|name| !name.trim().is_empty())
                        .cloned()
                        .unwrap_or_else(|| format!("field{}", i + 1))
                })
                .collect();

            let suffix = match &self.config.reference_column {
                Some(column) => match self.column_index(column, &fields) {
                    Some(i) if !row[i].trim().is_empty() => row[i].trim().to_string(),
                    _ => {
                        tracing::debug!(
                            "Row {} of {} has no value for column {}, using the row number",
                            row_number,
                            reference,
                            column
                        );
                        row_number.to_string()
                    }
                },
                None => row_number.to_string(),
            };

            let content = self
                .config
                .content_columns
                .iter()
                .filter_map(|column| self.column_index(column, &fields))
                .map(|i| row[i].as_str())
                .collect::<Vec<_>>()
                .join(" ");

            let mut metadata = Metadata::new();
            metadata.set(PARENT_REFERENCE_FIELD, reference);
            for (field, value) in fields.iter().zip(&row) {
                metadata.add(field, value.as_str());
            }

            children.push(Document::new(format!("{}!{}", reference, suffix), content).with_metadata(metadata));
        }
        tracing::debug!("Split {} into {} documents", reference, children.len());
        Ok(children)
    }
}

fn cells(record: ByteRecord) -> Vec<String> {
    record.iter().map(|cell| String::from_utf8_lossy(cell).into_owned()).collect()
}
