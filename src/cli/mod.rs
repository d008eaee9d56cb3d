//! Command-line interface for docsift
//!
//! Parses arguments with clap, sets up logging and dispatches to the command
//! implementations under [`commands`].

pub mod commands;
pub mod output;

pub use commands::Cli;
pub use output::Output;
