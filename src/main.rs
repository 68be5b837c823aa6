use anyhow::Result;
use clap::Parser;

use primesift::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
