use anyhow::Result;
use clap::Parser;
use droop_cli::{cli::NvCli, commands, logging};

fn main() -> Result<()> {
    let cli = NvCli::parse();
    logging::init(cli.common.verbose);

    for path in commands::nv::handle(&cli)? {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
