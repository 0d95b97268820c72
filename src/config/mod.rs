//! Configuration facade.
//!
//! [`Config`] wraps a [`Tree`] and a [`ProfileResolver`]:
//! - Reads go through the active profile (`profile.key`, then `key`)
//! - Writes always target the path exactly as given
//! - Merges are key-wise and in place; see [`Tree::merge`]
//!
//! ## Aliasing
//! [`Config::sub_config`] returns a view that shares the section it was
//! taken from. Writes through the view are visible in the parent and the
//! other way round. Use [`Config::deep_clone`] for an independent copy.

mod accessors;
mod loader;

pub use loader::{SourceFormat, load_file, load_files, parse_string};

use crate::error::{ConfigError, Result};
use crate::node::{Node, SectionRef};
use crate::profile::ProfileResolver;
use crate::tree::Tree;
use serde::de::DeserializeOwned;

/// A configuration tree with profile-aware typed access.
#[derive(Debug, Default)]
pub struct Config {
    tree: Tree,
    resolver: ProfileResolver,
}

impl Config {
    /// An empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tree(tree: Tree) -> Self {
        Self {
            tree,
            resolver: ProfileResolver::new(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// An independent copy of the tree, keeping the active profile.
    pub fn deep_clone(&self) -> Self {
        Self {
            tree: self.tree.deep_clone(),
            resolver: self.resolver.clone(),
        }
    }

    // Profiles

    /// The active profile, or `""`.
    pub fn profile(&self) -> &str {
        self.resolver.profile()
    }

    pub fn is_profile_enabled(&self) -> bool {
        self.resolver.is_enabled()
    }

    /// Activate the profile `name`, which must name an existing section.
    ///
    /// Fails with `profile doesn't exists: <name>` and keeps the current
    /// profile otherwise.
    pub fn set_profile(&mut self, name: &str) -> Result<()> {
        self.resolver.set(&self.tree, name)
    }

    pub fn clear_profile(&mut self) {
        self.resolver.clear();
    }

    // Lookup

    /// Run `f` against the profile-resolved node at `path`.
    pub fn lookup<R>(&self, path: &str, f: impl FnOnce(&Node) -> R) -> Option<R> {
        let resolved = self.resolver.resolve(&self.tree, path)?;
        self.tree.lookup(&resolved, f)
    }

    /// The raw node at `path`, resolved through the active profile.
    pub fn get(&self, path: &str) -> Option<Node> {
        self.lookup(path, Node::clone)
    }

    /// True if `path` resolves to any node, scalar or section.
    pub fn exists(&self, path: &str) -> bool {
        self.resolver.resolve(&self.tree, path).is_some()
    }

    /// A view rooted at the section found at `path`.
    ///
    /// The view shares the section with `self` and starts without a profile.
    /// Returns `None` unless `path` resolves to a section.
    pub fn sub_config(&self, path: &str) -> Option<Config> {
        let root = self
            .lookup(path, |node| node.as_section().cloned())
            .flatten()?;
        Some(Config::from_tree(Tree::from_shared(root)))
    }

    /// Keys of the root section, in order.
    pub fn keys(&self) -> Vec<String> {
        self.tree.keys("")
    }

    /// Keys of the section at `path`; empty if `path` is not a section.
    pub fn keys_by_path(&self, path: &str) -> Vec<String> {
        self.lookup(path, |node| node.as_section().map(SectionRef::keys))
            .flatten()
            .unwrap_or_default()
    }

    // Merging

    /// Merge `source` into the root of this configuration.
    pub fn merge<'a>(&mut self, source: impl Into<Option<&'a Config>>) -> Result<()> {
        let source = source.into().ok_or_else(ConfigError::source_is_nil)?;
        self.tree.merge(&source.tree, "")
    }

    /// Merge `source` into the section at `path`, creating it if absent.
    pub fn merge_to_section<'a>(
        &mut self,
        path: &str,
        source: impl Into<Option<&'a Config>>,
    ) -> Result<()> {
        let source = source.into().ok_or_else(ConfigError::source_is_nil)?;
        if path.is_empty() {
            return Err(ConfigError::key_is_empty());
        }
        self.tree.merge(&source.tree, path)
    }

    // Output

    /// The whole tree as pretty-printed JSON, ignoring the active profile.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self.tree.root())?)
    }

    /// Deserialize the node at `path` (empty = whole tree) into `T`.
    ///
    /// Returns `Ok(None)` when the path does not resolve.
    pub fn extract<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let Some(value) = self.lookup(path, |node| serde_json::to_value(node)) else {
            return Ok(None);
        };
        let value = value?;
        serde_json::from_value(value)
            .map(Some)
            .map_err(|source| ConfigError::Deserialize {
                path: path.to_string(),
                source,
            })
    }
}

impl From<Tree> for Config {
    fn from(tree: Tree) -> Self {
        Config::from_tree(tree)
    }
}
