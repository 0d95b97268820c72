//! Structured error types for configuration operations.

use crate::node::NodeKind;
use serde::Serialize;
use std::path::PathBuf;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Input errors
    ParseError,
    InvalidArgument,
    InvalidProfile,

    // Conflict errors
    TypeConflict,

    // Environment errors
    IoError,
    SerializeError,
}

/// Errors returned by the configuration tree, loader and facade.
///
/// A missing key is never an error; lookups report it as `None`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed source text.
    #[error("{origin}:{line}:{column}: {message}")]
    Parse {
        origin: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// A section and a non-section met at the same path.
    #[error("type conflict at '{path}': source ({source_kind}) and target ({target_kind})")]
    TypeConflict {
        path: String,
        source_kind: NodeKind,
        target_kind: NodeKind,
    },

    #[error("profile doesn't exists: {0}")]
    InvalidProfile(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("does not exists: {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("json serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("cannot extract '{path}': {source}")]
    Deserialize {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::Parse { .. } | ConfigError::Yaml { .. } => ErrorCode::ParseError,
            ConfigError::TypeConflict { .. } => ErrorCode::TypeConflict,
            ConfigError::InvalidProfile(_) => ErrorCode::InvalidProfile,
            ConfigError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            ConfigError::Io { .. } => ErrorCode::IoError,
            ConfigError::Serialize(_) | ConfigError::Deserialize { .. } => {
                ErrorCode::SerializeError
            }
        }
    }

    // Convenience constructors

    pub fn source_is_nil() -> Self {
        ConfigError::InvalidArgument("source is nil".to_string())
    }

    pub fn key_is_empty() -> Self {
        ConfigError::InvalidArgument("key is empty".to_string())
    }

    pub fn invalid_path(path: &str) -> Self {
        ConfigError::InvalidArgument(format!("invalid key path '{}'", path))
    }

    pub fn type_conflict(path: impl Into<String>, source: NodeKind, target: NodeKind) -> Self {
        ConfigError::TypeConflict {
            path: path.into(),
            source_kind: source,
            target_kind: target,
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
