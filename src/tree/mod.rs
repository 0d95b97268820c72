//! Hierarchical key-path model.
//!
//! A [`Tree`] owns one root section and addresses nodes with dotted paths
//! (`a.b.c`). Every segment but the last must name a section.

mod merge;

use crate::error::{ConfigError, Result};
use crate::node::{Node, NodeKind, Section, SectionRef};
use tracing::debug;

/// Split a dotted path into segments.
///
/// The empty path addresses the root and yields no segments. Empty segments
/// (`a..b`, `.a`, `a.`) are rejected.
pub(crate) fn split_path(path: &str) -> Result<Vec<&str>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(ConfigError::invalid_path(path));
    }
    Ok(segments)
}

pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Walk `segments` from `root`, creating missing sections on the way.
///
/// Fails with a type conflict on the first existing non-section segment.
/// Sections are only created after the last existing segment, so a failure
/// never leaves new sections behind.
fn vivify(root: &SectionRef, segments: &[&str]) -> Result<SectionRef> {
    let mut current = root.clone();
    for (depth, segment) in segments.iter().enumerate() {
        let next = {
            let mut section = current.write();
            let existing = section
                .get(*segment)
                .map(|node| node.as_section().cloned().ok_or(node.kind()));
            match existing {
                Some(Ok(child)) => child,
                Some(Err(kind)) => {
                    return Err(ConfigError::type_conflict(
                        segments[..=depth].join("."),
                        NodeKind::Section,
                        kind,
                    ));
                }
                None => {
                    let child = SectionRef::default();
                    section.insert(segment.to_string(), Node::Section(child.clone()));
                    child
                }
            }
        };
        current = next;
    }
    Ok(current)
}

fn descend<R>(section: &SectionRef, segments: &[&str], f: impl FnOnce(&Node) -> R) -> Option<R> {
    let (first, rest) = segments.split_first()?;
    let guard = section.read();
    let node = guard.get(*first)?;
    if rest.is_empty() {
        return Some(f(node));
    }
    let child = node.as_section()?.clone();
    drop(guard);
    descend(&child, rest, f)
}

/// Owner of a configuration root section.
#[derive(Debug, Default, PartialEq)]
pub struct Tree {
    root: SectionRef,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_section(section: Section) -> Self {
        Self {
            root: SectionRef::new(section),
        }
    }

    /// Wrap an existing section handle without copying it.
    pub(crate) fn from_shared(root: SectionRef) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &SectionRef {
        &self.root
    }

    /// An independent copy of the whole tree.
    pub fn deep_clone(&self) -> Self {
        Self {
            root: self.root.deep_clone(),
        }
    }

    /// Run `f` against the node at `path` without cloning it.
    ///
    /// Returns `None` when the path is malformed, an intermediate segment is
    /// missing or not a section, or the last segment is missing.
    pub fn lookup<R>(&self, path: &str, f: impl FnOnce(&Node) -> R) -> Option<R> {
        let segments = split_path(path).ok()?;
        if segments.is_empty() {
            return Some(f(&Node::Section(self.root.clone())));
        }
        descend(&self.root, &segments, f)
    }

    /// The node at `path`. Sections come back as shared handles.
    pub fn get(&self, path: &str) -> Option<Node> {
        self.lookup(path, Node::clone)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lookup(path, |_| ()).is_some()
    }

    pub fn section(&self, path: &str) -> Option<SectionRef> {
        self.lookup(path, |node| node.as_section().cloned()).flatten()
    }

    /// Ordered child keys of the section at `path`, empty if there is none.
    pub fn keys(&self, path: &str) -> Vec<String> {
        self.section(path)
            .map(|section| section.keys())
            .unwrap_or_default()
    }

    /// Store `value` at `path`, creating intermediate sections as needed.
    ///
    /// Section values are deep-copied on the way in, so the tree never
    /// aliases a section owned elsewhere.
    pub fn set(&mut self, path: &str, value: impl Into<Node>) -> Result<()> {
        let segments = split_path(path)?;
        let Some((leaf, parents)) = segments.split_last() else {
            return Err(ConfigError::key_is_empty());
        };
        // Copy before locking: the value may alias a section on this path
        let value = value.into().deep_clone();
        if !value.is_finite() {
            return Err(ConfigError::InvalidArgument(format!(
                "non-finite number at '{}'",
                path
            )));
        }
        let parent = vivify(&self.root, parents)?;
        parent.write().insert(leaf.to_string(), value);
        Ok(())
    }

    /// Merge `source` into the section at `target_path` (empty = root).
    ///
    /// The destination section is created when absent. The source is
    /// snapshotted first, and conflicts are detected before anything is
    /// written: on error the receiver is unchanged.
    pub fn merge(&mut self, source: &Tree, target_path: &str) -> Result<()> {
        let incoming = source.root.snapshot();
        let segments = split_path(target_path)?;
        let target = vivify(&self.root, &segments)?;
        debug!(
            target = %target_path,
            keys = incoming.len(),
            "merging configuration tree"
        );
        merge::merge_section(&target, incoming, target_path)
    }
}

impl From<Section> for Tree {
    fn from(section: Section) -> Self {
        Tree::from_section(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> Tree {
        match Node::from(value) {
            Node::Section(root) => Tree::from_shared(root),
            other => panic!("expected an object, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("").unwrap(), Vec::<&str>::new());
        assert_eq!(split_path("a.b.c").unwrap(), vec!["a", "b", "c"]);
        assert!(split_path("a..b").is_err());
        assert!(split_path(".a").is_err());
        assert!(split_path("a.").is_err());
    }

    #[test]
    fn test_get_descends_sections() {
        let t = tree(json!({"a": {"b": {"c": 42}}, "s": "text"}));
        assert_eq!(t.get("a.b.c"), Some(Node::Int(42)));
        assert!(t.get("a.b").unwrap().is_section());
        assert_eq!(t.get("s"), Some(Node::from("text")));
    }

    #[test]
    fn test_get_misses_never_panic() {
        let t = tree(json!({"a": {"b": 1}, "s": "text"}));
        assert_eq!(t.get("missing"), None);
        assert_eq!(t.get("a.missing"), None);
        assert_eq!(t.get("s.below"), None);
        assert_eq!(t.get("a..b"), None);
        assert_eq!(t.get("."), None);
        assert!(!t.contains("a.b.c"));
    }

    #[test]
    fn test_empty_path_is_root() {
        let t = tree(json!({"x": 1}));
        let root = t.get("").unwrap();
        assert!(root.as_section().unwrap().ptr_eq(t.root()));
    }

    #[test]
    fn test_keys() {
        let mut t = Tree::new();
        t.set("server.port", 8080).unwrap();
        t.set("server.host", "localhost").unwrap();
        t.set("debug", true).unwrap();

        assert_eq!(t.keys(""), vec!["server", "debug"]);
        assert_eq!(t.keys("server"), vec!["port", "host"]);
        assert!(t.keys("server.port").is_empty());
        assert!(t.keys("nope").is_empty());
    }

    #[test]
    fn test_set_auto_vivifies() {
        let mut t = Tree::new();
        t.set("request.id.header", "X-Request-Id").unwrap();
        assert!(t.get("request").unwrap().is_section());
        assert!(t.get("request.id").unwrap().is_section());
        assert_eq!(t.get("request.id.header"), Some(Node::from("X-Request-Id")));
    }

    #[test]
    fn test_set_through_scalar_is_type_conflict() {
        let mut t = tree(json!({"a": {"b": 1}}));
        let err = t.set("a.b.c", 2).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::TypeConflict {
                ref path,
                source_kind: NodeKind::Section,
                target_kind: NodeKind::Int,
            } if path == "a.b"
        ));
        assert_eq!(t.get("a.b"), Some(Node::Int(1)));
    }

    #[test]
    fn test_set_rejects_empty_and_malformed_paths() {
        let mut t = Tree::new();
        assert_eq!(t.set("", 1).unwrap_err().to_string(), "key is empty");
        assert!(t.set("a..b", 1).is_err());
        assert!(t.keys("").is_empty());
    }

    #[test]
    fn test_set_rejects_non_finite_floats() {
        let mut t = tree(json!({"ratio": 0.5}));
        let err = t.set("ratio", f64::INFINITY).unwrap_err();
        assert_eq!(err.to_string(), "non-finite number at 'ratio'");
        assert!(t.set("weights", vec![1.0, f64::NAN]).is_err());
        assert!(t.set("limits.max", f32::NEG_INFINITY).is_err());

        assert_eq!(t.get("ratio"), Some(Node::Float(0.5)));
        assert!(!t.contains("weights"));
        assert!(!t.contains("limits"));
    }

    #[test]
    fn test_set_replaces_leaf_of_any_kind() {
        let mut t = tree(json!({"a": {"b": 1}}));
        t.set("a", "flat").unwrap();
        assert_eq!(t.get("a"), Some(Node::from("flat")));
    }

    #[test]
    fn test_set_copies_section_values() {
        let mut t = tree(json!({"a": {"b": 1}}));
        let shared = t.get("a").unwrap();
        t.set("a.copy", shared.clone()).unwrap();

        t.set("a.copy.b", 2).unwrap();
        assert_eq!(t.get("a.b"), Some(Node::Int(1)));
        assert_eq!(t.get("a.copy.b"), Some(Node::Int(2)));
    }

    #[test]
    fn test_merge_into_named_section_creates_it() {
        let mut target = tree(json!({"x": 1}));
        let source = tree(json!({"integer": 500}));
        target.merge(&source, "new.prod").unwrap();
        assert_eq!(target.get("new.prod.integer"), Some(Node::Int(500)));
    }

    #[test]
    fn test_merge_into_scalar_destination_fails() {
        let mut target = tree(json!({"x": 1}));
        let source = tree(json!({"y": 2}));
        let err = target.merge(&source, "x").unwrap_err();
        assert!(matches!(err, ConfigError::TypeConflict { .. }));
        assert_eq!(target.keys(""), vec!["x"]);
    }

    #[test]
    fn test_merge_tree_into_its_own_subsection() {
        let mut t = tree(json!({"a": {"b": 1}}));
        let view = Tree::from_shared(t.section("a").unwrap());
        t.merge(&view, "a.nested").unwrap();
        assert_eq!(t.get("a.nested.b"), Some(Node::Int(1)));
        assert_eq!(t.get("a.b"), Some(Node::Int(1)));
    }
}
