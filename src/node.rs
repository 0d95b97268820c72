//! Configuration tree nodes.
//!
//! A [`Node`] is a closed tagged value. Sections are held behind a shared
//! [`SectionRef`] handle so that a sub-configuration can alias the section it
//! was taken from; every other variant is a plain owned value.

use indexmap::IndexMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::sync::Arc;

/// Insertion-ordered mapping of keys to child nodes.
pub type Section = IndexMap<String, Node>;

/// Variant tag of a [`Node`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    List,
    Section,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Null => "NULL",
            NodeKind::Bool => "BOOL",
            NodeKind::Int => "INT",
            NodeKind::Float => "FLOAT",
            NodeKind::String => "STRING",
            NodeKind::List => "LIST",
            NodeKind::Section => "SECTION",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared handle to a [`Section`].
///
/// Cloning the handle aliases the section: writes through one clone are
/// visible through every other. Use [`SectionRef::deep_clone`] for an
/// independent copy.
#[derive(Clone, Default)]
pub struct SectionRef(Arc<RwLock<Section>>);

impl SectionRef {
    pub fn new(section: Section) -> Self {
        Self(Arc::new(RwLock::new(section)))
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Section> {
        self.0.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Section> {
        self.0.write()
    }

    /// True if both handles point at the same section.
    pub fn ptr_eq(&self, other: &SectionRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Recursively copy the section contents into fresh, unshared handles.
    pub fn snapshot(&self) -> Section {
        self.read()
            .iter()
            .map(|(key, node)| (key.clone(), node.deep_clone()))
            .collect()
    }

    pub fn deep_clone(&self) -> SectionRef {
        SectionRef::new(self.snapshot())
    }

    pub fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }
}

impl fmt::Debug for SectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}

impl PartialEq for SectionRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl From<Section> for SectionRef {
    fn from(section: Section) -> Self {
        SectionRef::new(section)
    }
}

/// A configuration value.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Node>),
    Section(SectionRef),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Int(_) => NodeKind::Int,
            Node::Float(_) => NodeKind::Float,
            Node::String(_) => NodeKind::String,
            Node::List(_) => NodeKind::List,
            Node::Section(_) => NodeKind::Section,
        }
    }

    /// A new, empty section node.
    pub fn section() -> Node {
        Node::Section(SectionRef::default())
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Node::Section(_))
    }

    pub fn as_section(&self) -> Option<&SectionRef> {
        match self {
            Node::Section(section) => Some(section),
            _ => None,
        }
    }

    /// False if any float in the node, nested ones included, is NaN or
    /// infinite. JSON has no representation for those.
    pub fn is_finite(&self) -> bool {
        match self {
            Node::Float(f) => f.is_finite(),
            Node::List(items) => items.iter().all(Node::is_finite),
            Node::Section(section) => section.read().values().all(Node::is_finite),
            _ => true,
        }
    }

    /// Copy the node, giving every nested section its own handle.
    pub fn deep_clone(&self) -> Node {
        match self {
            Node::Section(section) => Node::Section(section.deep_clone()),
            Node::List(items) => Node::List(items.iter().map(Node::deep_clone).collect()),
            other => other.clone(),
        }
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Node::Bool(value)
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Node::Int(i64::from(value))
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Node::Int(value)
    }
}

impl From<f32> for Node {
    fn from(value: f32) -> Self {
        Node::Float(f64::from(value))
    }
}

impl From<f64> for Node {
    fn from(value: f64) -> Self {
        Node::Float(value)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Node::String(value)
    }
}

impl From<Section> for Node {
    fn from(value: Section) -> Self {
        Node::Section(SectionRef::new(value))
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(values: Vec<T>) -> Self {
        Node::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Node::Null, Into::into)
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::from(
                map.into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect::<Section>(),
            ),
        }
    }
}

/// Typed conversion out of a [`Node`].
///
/// Returns `None` when the node has the wrong variant or the value does not
/// fit the target type. Narrowing conversions are checked, never truncating.
pub trait FromNode: Sized {
    fn from_node(node: &Node) -> Option<Self>;
}

impl FromNode for Node {
    fn from_node(node: &Node) -> Option<Self> {
        Some(node.clone())
    }
}

impl FromNode for String {
    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::String(s) => Some(s.clone()),
            _ => None,
        }
    }
}

impl FromNode for bool {
    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl FromNode for i64 {
    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl FromNode for i32 {
    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }
}

impl FromNode for f64 {
    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::Float(f) => Some(*f),
            Node::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl FromNode for f32 {
    fn from_node(node: &Node) -> Option<Self> {
        let wide = f64::from_node(node)?;
        let narrow = wide as f32;
        // Finite values outside the f32 range must not become infinity
        if wide.is_finite() && !narrow.is_finite() {
            return None;
        }
        Some(narrow)
    }
}

impl<T: FromNode> FromNode for Vec<T> {
    fn from_node(node: &Node) -> Option<Self> {
        match node {
            Node::List(items) => items.iter().map(T::from_node).collect(),
            _ => None,
        }
    }
}

impl Serialize for SectionRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let section = self.read();
        let mut map = serializer.serialize_map(Some(section.len()))?;
        for (key, node) in section.iter() {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::String(s) => serializer.serialize_str(s),
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Section(section) => section.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_finite_checks_nested_floats() {
        assert!(Node::Float(1.5).is_finite());
        assert!(!Node::Float(f64::NAN).is_finite());
        assert!(!Node::from(vec![1.0, f64::INFINITY]).is_finite());

        let mut section = Section::new();
        section.insert("limit".into(), Node::Float(f64::NEG_INFINITY));
        assert!(!Node::from(section).is_finite());
        assert!(Node::from("inf").is_finite());
    }

    #[test]
    fn test_kind_names_are_upper_case() {
        assert_eq!(Node::from("x").kind().to_string(), "STRING");
        assert_eq!(Node::section().kind().to_string(), "SECTION");
        assert_eq!(Node::Null.kind().to_string(), "NULL");
    }

    #[test]
    fn test_int_narrowing_is_checked() {
        assert_eq!(i32::from_node(&Node::Int(32)), Some(32));
        assert_eq!(i32::from_node(&Node::Int(i64::from(i32::MAX) + 1)), None);
        assert_eq!(i64::from_node(&Node::Float(1.5)), None);
    }

    #[test]
    fn test_float_narrowing_is_checked() {
        assert_eq!(f32::from_node(&Node::Float(32.2)), Some(32.2f32));
        assert_eq!(f32::from_node(&Node::Float(1e300)), None);
        assert_eq!(f64::from_node(&Node::Int(7)), Some(7.0));
    }

    #[test]
    fn test_list_conversion_fails_on_any_bad_element() {
        let good = Node::from(vec![10, 20, 30]);
        assert_eq!(Vec::<i32>::from_node(&good), Some(vec![10, 20, 30]));

        let mixed = Node::List(vec![Node::Int(1), Node::from("two")]);
        assert_eq!(Vec::<i64>::from_node(&mixed), None);
        assert_eq!(Vec::<String>::from_node(&Node::from("scalar")), None);
    }

    #[test]
    fn test_section_ref_clone_aliases_and_deep_clone_does_not() {
        let original = SectionRef::default();
        let alias = original.clone();
        let copy = original.deep_clone();

        alias.write().insert("a".into(), Node::Int(1));

        assert!(original.ptr_eq(&alias));
        assert_eq!(original.read().get("a"), Some(&Node::Int(1)));
        assert!(copy.read().is_empty());
    }

    #[test]
    fn test_serialize_preserves_section_order() {
        let mut section = Section::new();
        section.insert("zeta".into(), Node::Int(1));
        section.insert("alpha".into(), Node::from(vec!["x", "y"]));
        section.insert("mid".into(), Node::Null);

        let json = serde_json::to_string(&Node::from(section)).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":["x","y"],"mid":null}"#);
    }
}
