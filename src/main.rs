//! hocon-config
//!
//! Loads one or more configuration files, merges them in order and prints
//! values, keys or the merged tree.

use anyhow::{Context, Result};
use clap::Parser;
use hocon_config::cli::{self, Cli};
use hocon_config::logging::{self, LogTarget};
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&LogTarget::parse(&cli.log), cli.verbose)?;
    debug!(command = ?cli.command, "starting");

    let config = cli::load(&cli).context("failed to load configuration")?;
    let output = cli::run(&config, &cli.command)?;
    println!("{}", output);
    Ok(())
}
