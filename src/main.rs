use anyhow::Result;
use clap::Parser;

use rene::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
