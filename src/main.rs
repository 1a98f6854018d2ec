use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = setpass::cli::Cli::parse();
    cli.run()
}
