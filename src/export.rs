// Author: Dustin Pilgrim
// License: MIT

use serde_json::json;

use crate::ast::{Node, Value};
use crate::resolver::Resolver;
use crate::DbError;

/// Render every leaf key path under `root` as a flat JSON object of resolved values.
///
/// Keys are the full key paths, in lexical order. Absent values export as JSON `null`;
/// mappings and sequences export as authored.
///
/// # Examples
/// ```
/// use platdb::{Document, Resolver, export};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let doc = Document::from_json_str(r#"{ "arm": { "rel": "19.01", "vsn": "{rel}c" } }"#)?;
/// let json = export::export_resolved(&Resolver::new(&doc), "arm", None)?;
/// assert!(json.contains(r#""arm.vsn": "19.01c""#));
/// # Ok(())
/// # }
/// ```
pub fn export_resolved(
    resolver: &Resolver<'_>,
    root: &str,
    context: Option<&str>,
) -> Result<String, DbError> {
    let mut out = serde_json::Map::new();
    for key in resolver.document().key_paths(root) {
        let value = resolver.lookup(&key, context, true)?;
        out.insert(key, value_to_json(&value));
    }

    serde_json::to_string_pretty(&serde_json::Value::Object(out)).map_err(|e| DbError::ParseError {
        message: format!("Failed to serialize export: {}", e),
        hint: None,
        code: Some(313),
    })
}

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => json!(b),
        Value::String(s) => json!(s),
        Value::Integer(n) => json!(n),
        Value::Mapping(items) => serde_json::Value::Object(
            items
                .iter()
                .map(|(k, v)| (k.clone(), node_to_json(v)))
                .collect(),
        ),
        Value::Sequence(items) => json!(items.iter().map(node_to_json).collect::<Vec<_>>()),
    }
}

pub fn node_to_json(node: &Node) -> serde_json::Value {
    match node {
        Node::String(s) => json!(s),
        Node::Integer(n) => json!(n),
        Node::Mapping(items) => serde_json::Value::Object(
            items
                .iter()
                .map(|(k, v)| (k.clone(), node_to_json(v)))
                .collect(),
        ),
        Node::Sequence(items) => json!(items.iter().map(node_to_json).collect::<Vec<_>>()),
    }
}
