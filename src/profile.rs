//! Profile overlay resolution.
//!
//! With an active profile `prod`, a read of `key` first tries `prod.key` and
//! falls back to the bare `key`. Profile values shadow globals; globals stay
//! visible for keys the profile does not override.

use crate::error::{ConfigError, Result};
use crate::tree::{Tree, join_path};
use std::borrow::Cow;
use tracing::debug;

/// Active profile of a configuration view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileResolver {
    profile: String,
}

impl ProfileResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The active profile, or `""` when none is set.
    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn is_enabled(&self) -> bool {
        !self.profile.is_empty()
    }

    /// Activate `name`, which must resolve to a section of `tree`.
    ///
    /// Dotted names (`env.dev`) address nested sections. On failure the
    /// previously active profile stays in place.
    pub fn set(&mut self, tree: &Tree, name: &str) -> Result<()> {
        if name.is_empty() || tree.section(name).is_none() {
            return Err(ConfigError::InvalidProfile(name.to_string()));
        }
        debug!(profile = %name, previous = %self.profile, "activating profile");
        self.profile = name.to_string();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.profile.clear();
    }

    /// The profile-qualified form of `key`, if a profile is active.
    pub fn qualify(&self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        if key.is_empty() {
            return Some(self.profile.clone());
        }
        Some(join_path(&self.profile, key))
    }

    /// The path `key` resolves to in `tree`: the profile-qualified path when
    /// it exists, otherwise the bare key when that exists.
    pub fn resolve<'a>(&self, tree: &Tree, key: &'a str) -> Option<Cow<'a, str>> {
        if let Some(qualified) = self.qualify(key)
            && tree.contains(&qualified)
        {
            return Some(Cow::Owned(qualified));
        }
        tree.contains(key).then_some(Cow::Borrowed(key))
    }
}
