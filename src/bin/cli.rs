// src/bin/cli.rs
use clap::Parser;
use monitor_legislativo::cli::{self, Cli};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = monitor_legislativo::log::init() {
        eprintln!("log disabled: {e}");
    }
    cli::run(Cli::parse())
}
