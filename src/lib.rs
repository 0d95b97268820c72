//! HOCON-like configuration trees
//!
//! Parse configuration text or files into an ordered tree of sections,
//! merge trees key by key, and read typed values through an optional
//! profile overlay.
//!
//! ```
//! use hocon_config::parse_string;
//!
//! let mut cfg = parse_string("port = 80\nprod { port = 443 }").unwrap();
//! assert_eq!(cfg.int("port"), Some(80));
//! cfg.set_profile("prod").unwrap();
//! assert_eq!(cfg.int("port"), Some(443));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod node;
pub mod parser;
pub mod profile;
pub mod tree;
pub mod view;

pub use config::{Config, SourceFormat, load_file, load_files, parse_string};
pub use error::{ConfigError, ErrorCode, Result};
pub use node::{FromNode, Node, NodeKind, Section, SectionRef};
pub use profile::ProfileResolver;
pub use tree::Tree;
pub use view::{ViewEngine, ViewError, add_engine, engine_names, get_engine};
