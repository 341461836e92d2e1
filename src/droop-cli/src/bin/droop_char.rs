use anyhow::Result;
use clap::Parser;
use droop_cli::{cli::CharCli, commands, logging};

fn main() -> Result<()> {
    let cli = CharCli::parse();
    logging::init(cli.common.verbose);

    let path = commands::characterize::handle(&cli)?;
    println!("\nSaved output to: {}", path.display());
    Ok(())
}
