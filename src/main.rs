mod cli;
mod controller;
mod engine;
mod model;
mod storage;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = args.script.is_some() || args.pipe || args.json;

    cli::run(args)?;

    // Explicitly exit with code 0 on success for non-TUI modes.
    if is_non_tui {
        std::process::exit(0);
    }
    Ok(())
}
