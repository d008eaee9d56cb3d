use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct VersionArgs {
    /// Show detailed version information
    #[arg(short = 'd', long = "detailed")]
    pub detailed: bool,
}

pub fn execute(args: VersionArgs) -> Result<()> {
    println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if args.detailed {
        println!("Rust Edition: 2024");
        println!("Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Description: {}", env!("CARGO_PKG_DESCRIPTION"));
    }
    Ok(())
}
