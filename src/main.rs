use anyhow::Result;
use clap::Parser;
use docsift::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
