//! Arguments for the get subcommand.

use crate::format::OutputFormat;
use clap::Args;

/// Arguments for the get subcommand
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Dotted key path, resolved through the active profile
    #[arg(value_name = "KEY")]
    pub key: String,

    /// Output format: text (default) or json
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,
}
