//! Document splitters

pub mod csv;

pub use csv::{CsvSplitter, CsvSplitterConfig, PARENT_REFERENCE_FIELD};
