//! Output formatting for resolved configuration values.

use crate::error::Result;
use crate::node::Node;

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "Invalid format '{}'. Valid options: text, json",
                s
            )),
        }
    }
}

/// Render `node` in the requested format.
pub fn format_node(node: &Node, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(node)?),
        OutputFormat::Text => format_text(node),
    }
}

/// Scalars print bare, lists one item per line, sections as JSON.
fn format_text(node: &Node) -> Result<String> {
    let text = match node {
        Node::Null => "null".to_string(),
        Node::Bool(b) => b.to_string(),
        Node::Int(i) => i.to_string(),
        Node::Float(f) => f.to_string(),
        Node::String(s) => s.clone(),
        Node::List(items) => items
            .iter()
            .map(|item| match item {
                Node::List(_) | Node::Section(_) => Ok(serde_json::to_string(item)?),
                scalar => format_text(scalar),
            })
            .collect::<Result<Vec<_>>>()?
            .join("\n"),
        Node::Section(_) => serde_json::to_string_pretty(node)?,
    };
    Ok(text)
}
