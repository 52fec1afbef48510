//! `optwire` 바이너리 진입점.

use std::env;

use anyhow::{Context, Result};
use optwire::interface::cli::Cli;

fn main() {
    Cli::parse_args();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let base_path = env::current_dir().context("failed to resolve current directory")?;
    optwire::run(base_path)
}
