use crate::cli::Output;
use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

pub mod config;
pub mod run;
pub mod version;

#[derive(Parser)]
#[command(
    name = "docsift",
    version = env!("CARGO_PKG_VERSION"),
    about = "Filter, tag, transform and split documents with configurable handler chains",
    long_about = "docsift runs a document through the pre-parse and post-parse handler chains \
                  of a configuration file and reports whether it was accepted, its metadata, \
                  its content and any child documents."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one document through the configured handlers
    Run(run::RunArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);
        let output = Output::new(self.verbose > 0, self.quiet);

        match self.command {
            Some(Commands::Run(args)) => run::execute(args, self.config.as_deref(), &output),
            Some(Commands::Config(args)) => config::execute(args, self.config.as_deref(), &output),
            Some(Commands::Version(args)) => version::execute(args),
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => tracing_subscriber::EnvFilter::new("warn"),
        1 => tracing_subscriber::EnvFilter::new("info,html5ever=warn,selectors=warn"),
        2 => tracing_subscriber::EnvFilter::new("debug,html5ever=warn,selectors=warn"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
