//! Process-wide registry of view engines.
//!
//! Templating engines register under a unique name at startup and are
//! looked up by name when a view is rendered. The registry only stores the
//! engines; rendering lives with the engines themselves.

use crate::config::Config;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Errors from engine registration and initialization.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("view: engine name '{0}' is already added, skip it")]
    DuplicateEngine(String),

    #[error("view: engine value is nil")]
    MissingEngine,

    /// Raised by an engine's own [`ViewEngine::init`].
    #[error("view: {0}")]
    Init(String),
}

/// A template engine that can be configured from a [`Config`].
pub trait ViewEngine: Send + Sync {
    /// Prepare the engine using `cfg`, resolving template paths against
    /// `base_dir`.
    fn init(&self, cfg: &Config, base_dir: &Path) -> Result<(), ViewError>;
}

static ENGINES: Lazy<RwLock<HashMap<String, Arc<dyn ViewEngine>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Register `engine` under `name`.
///
/// The first registration for a name wins; later ones are rejected and leave
/// the registry unchanged.
pub fn add_engine(name: &str, engine: Option<Arc<dyn ViewEngine>>) -> Result<(), ViewError> {
    let mut engines = ENGINES.write();
    if engines.contains_key(name) {
        return Err(ViewError::DuplicateEngine(name.to_string()));
    }
    let engine = engine.ok_or(ViewError::MissingEngine)?;
    engines.insert(name.to_string(), engine);
    debug!(engine = %name, "registered view engine");
    Ok(())
}

pub fn get_engine(name: &str) -> Option<Arc<dyn ViewEngine>> {
    ENGINES.read().get(name).cloned()
}

/// Registered engine names, sorted.
pub fn engine_names() -> Vec<String> {
    let mut names: Vec<String> = ENGINES.read().keys().cloned().collect();
    names.sort();
    names
}
