//! Configuration loading from text and files.
//!
//! Files are read whole and parsed by extension: `.yaml`/`.yml` through
//! serde_yaml, anything else through the native text parser. Several files
//! are merged left to right, later files overriding earlier ones.

use super::Config;
use crate::error::{ConfigError, Result};
use crate::node::{Node, Section};
use crate::parser;
use crate::tree::Tree;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Source syntax of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// The native HOCON-like text format
    Hocon,
    /// YAML with a mapping at the document root
    Yaml,
}

impl SourceFormat {
    /// Pick the format from the file extension. Unknown extensions are
    /// treated as the native format.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SourceFormat::Yaml
            }
            _ => SourceFormat::Hocon,
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceFormat::Hocon => write!(f, "hocon"),
            SourceFormat::Yaml => write!(f, "yaml"),
        }
    }
}

/// Parse configuration text. Errors name the source `<string>`.
pub fn parse_string(text: &str) -> Result<Config> {
    parse_source(text, "<string>")
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self> {
        parse_string(text)
    }
}

fn parse_source(text: &str, origin: &str) -> Result<Config> {
    let root = parser::parse(text, origin)?;
    Ok(Config::from_tree(Tree::from_section(root)))
}

/// Read and parse a single configuration file.
pub fn load_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let format = SourceFormat::from_path(path);
    let config = match format {
        SourceFormat::Hocon => parse_source(&content, &path.display().to_string())?,
        SourceFormat::Yaml => parse_yaml(&content, path)?,
    };

    debug!(
        path = %path.display(),
        %format,
        keys = config.keys().len(),
        "loaded configuration file"
    );
    Ok(config)
}

/// Load each file in order and merge it over the ones before.
///
/// Fails on the first unreadable or malformed file, or on the first merge
/// conflict. An empty list is rejected.
pub fn load_files<I, P>(paths: I) -> Result<Config>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut paths = paths.into_iter();
    let first = paths
        .next()
        .ok_or_else(|| ConfigError::InvalidArgument("no configuration files given".to_string()))?;

    let mut config = load_file(first)?;
    for path in paths {
        let overlay = load_file(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "merging configuration file");
        config.merge(&overlay)?;
    }
    Ok(config)
}

fn parse_yaml(content: &str, path: &Path) -> Result<Config> {
    let document: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

    let document = node_from_yaml(document);
    if !document.is_finite() {
        return Err(ConfigError::Parse {
            origin: path.display().to_string(),
            line: 1,
            column: 1,
            message: "non-finite number (.inf or .nan) is not supported".to_string(),
        });
    }

    let root = match document {
        Node::Null => Section::new(),
        Node::Section(section) => section.snapshot(),
        other => {
            return Err(ConfigError::Parse {
                origin: path.display().to_string(),
                line: 1,
                column: 1,
                message: format!("document root must be a mapping, found {}", other.kind()),
            });
        }
    };
    Ok(Config::from_tree(Tree::from_section(root)))
}

fn node_from_yaml(value: serde_yaml::Value) -> Node {
    use serde_yaml::Value;

    match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Node::Int(i),
            None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Node::String(s),
        Value::Sequence(items) => Node::List(items.into_iter().map(node_from_yaml).collect()),
        Value::Mapping(mapping) => {
            let mut section = Section::with_capacity(mapping.len());
            for (key, value) in mapping {
                let Some(key) = yaml_key(&key) else {
                    warn!(?key, "skipping non-scalar YAML mapping key");
                    continue;
                };
                section.insert(key, node_from_yaml(value));
            }
            Node::from(section)
        }
        Value::Tagged(tagged) => node_from_yaml(tagged.value),
    }
}

fn yaml_key(key: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a.yaml")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("a.YML")), SourceFormat::Yaml);
        assert_eq!(SourceFormat::from_path(Path::new("a.cfg")), SourceFormat::Hocon);
        assert_eq!(SourceFormat::from_path(Path::new("a")), SourceFormat::Hocon);
    }

    #[test]
    fn test_parse_string_and_from_str() {
        let cfg = parse_string("a { b = 1 }").unwrap();
        assert_eq!(cfg.int("a.b"), Some(1));

        let cfg: Config = "x = yes".parse().unwrap();
        assert_eq!(cfg.string("x").as_deref(), Some("yes"));
    }

    #[test]
    fn test_parse_error_names_string_origin() {
        let err = parse_string("a = {").unwrap_err();
        assert!(err.to_string().starts_with("<string>:"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_file("/definitely/not/here.cfg").unwrap_err();
        assert_eq!(err.to_string(), "does not exists: /definitely/not/here.cfg");
    }

    #[test]
    fn test_empty_file_list() {
        let err = load_files(Vec::<&str>::new()).unwrap_err();
        assert_eq!(err.to_string(), "no configuration files given");
    }

    #[test]
    fn test_yaml_conversion() {
        let cfg = parse_yaml(
            "name: svc\nport: 80\nratio: 0.5\ntags: [a, b]\nnested:\n  on: true\n  7: seven\n",
            Path::new("inline.yaml"),
        )
        .unwrap();

        assert_eq!(cfg.keys(), vec!["name", "port", "ratio", "tags", "nested"]);
        assert_eq!(cfg.int("port"), Some(80));
        assert_eq!(cfg.float64("ratio"), Some(0.5));
        assert_eq!(
            cfg.string_list("tags"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(cfg.bool("nested.on"), Some(true));
        assert_eq!(cfg.string("nested.7").as_deref(), Some("seven"));
    }

    #[test]
    fn test_yaml_non_finite_number_rejected() {
        let err = parse_yaml("limits:\n  max: .inf\n", Path::new("limits.yaml")).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ParseError);
        assert!(err.to_string().contains("non-finite number"));
    }

    #[test]
    fn test_yaml_root_must_be_mapping() {
        let err = parse_yaml("- a\n- b\n", Path::new("list.yaml")).unwrap_err();
        assert!(err.to_string().contains("document root must be a mapping"));

        let cfg = parse_yaml("~\n", Path::new("empty.yaml")).unwrap();
        assert!(cfg.keys().is_empty());
    }
}
