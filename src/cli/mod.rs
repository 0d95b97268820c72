//! CLI command definitions for hocon-config
//!
//! This module defines the CLI structure using clap's derive macros and
//! runs subcommands against a loaded [`Config`].

pub mod get;

use crate::config::{Config, load_files};
use crate::error::{ConfigError, Result};
use crate::format::format_node;
use crate::node::Node;
use clap::{Parser, Subcommand};
use get::GetArgs;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable naming the default profile.
pub const PROFILE_ENV: &str = "HOCON_CONFIG_PROFILE";

/// Inspect and merge HOCON-like configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file; repeat to merge, later files win
    #[arg(short, long = "file", value_name = "FILE", global = true)]
    pub files: Vec<PathBuf>,

    /// Profile to resolve keys through
    #[arg(short, long, env = PROFILE_ENV, global = true)]
    pub profile: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the value a key resolves to
    Get(GetArgs),

    /// List child keys of a section (root if omitted)
    Keys {
        #[arg(value_name = "PATH", default_value = "")]
        path: String,
    },

    /// Print the merged tree as JSON
    Json,

    /// Load and merge the files, reporting only success or failure
    Check,
}

/// Load and merge `cli.files`, then activate the requested profile.
pub fn load(cli: &Cli) -> Result<Config> {
    let mut config = load_files(&cli.files)?;
    if let Some(profile) = cli.profile.as_deref().filter(|name| !name.is_empty()) {
        config.set_profile(profile)?;
    }
    debug!(
        files = cli.files.len(),
        profile = %config.profile(),
        "configuration ready"
    );
    Ok(config)
}

/// Run `command` and return its output text.
pub fn run(config: &Config, command: &Command) -> Result<String> {
    match command {
        Command::Get(args) => {
            let node = config.get(&args.key).ok_or_else(|| {
                ConfigError::InvalidArgument(format!("key not found: {}", args.key))
            })?;
            format_node(&node, args.format)
        }
        Command::Keys { path } if path.is_empty() => Ok(config.keys().join("\n")),
        Command::Keys { path } => match config.lookup(path, Node::is_section) {
            Some(true) => Ok(config.keys_by_path(path).join("\n")),
            _ => Err(ConfigError::InvalidArgument(format!(
                "not a section: {}",
                path
            ))),
        },
        Command::Json => config.to_json(),
        Command::Check => Ok(format!("ok: {} top-level keys", config.keys().len())),
    }
}
