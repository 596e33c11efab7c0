// Author: Dustin Pilgrim
// License: MIT

//! Builds a [`Document`] from JSON text or files.
//!
//! JSON maps onto nodes as follows: strings, integers, arrays and objects map directly;
//! `null` and `true` become the reserved literal strings `"null"` and `"true"`; `false`
//! becomes the plain string `"false"`. Floating point numbers are rejected. Object keys keep
//! their authored order.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ast::{Document, Mapping, Node};
use crate::DbError;

impl Document {
    /// Parse a document from JSON text. The top level must be an object.
    pub fn from_json_str(content: &str) -> Result<Self, DbError> {
        let json: serde_json::Value =
            serde_json::from_str(content).map_err(|e| DbError::ParseError {
                message: format!("Invalid JSON at {}:{}: {}", e.line(), e.column(), e),
                hint: None,
                code: Some(310),
            })?;

        match node_from_json(json, "")? {
            Node::Mapping(root) => Ok(Document::new(root)),
            _ => Err(DbError::ParseError {
                message: "Top level of the document is not an object".into(),
                hint: Some("Wrap the document in { ... }".into()),
                code: Some(312),
            }),
        }
    }

    /// Load a document file. A leading `~/` is expanded to the home directory.
    ///
    /// # Example
    /// ```ignore
    /// let doc = Document::from_file("~/.config/platdb/platforms.json")?;
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let path = expand_path(path.as_ref())?;
        debug!(path = %path.display(), "loading document");

        let content = fs::read_to_string(&path)
            .map_err(|e| unreadable(path.display(), e.to_string(), 301))?;
        Self::from_json_str(&content)
    }

    /// Load `primary`, or `fallback` when `primary` cannot be read.
    ///
    /// Parse errors in the primary file are returned as is. If neither file can be read,
    /// the error carries both reasons.
    pub fn from_file_with_fallback<P: AsRef<Path>>(primary: P, fallback: P) -> Result<Self, DbError> {
        let (primary, fallback) = (primary.as_ref(), fallback.as_ref());
        let primary_reason = match Self::from_file(primary) {
            Err(DbError::FileError { message, .. }) => message,
            loaded => return loaded,
        };

        debug!(primary = %primary.display(), fallback = %fallback.display(), "trying fallback document");
        match Self::from_file(fallback) {
            Err(DbError::FileError { message, .. }) => Err(unreadable(
                format!("{} (fallback: {})", primary.display(), fallback.display()),
                format!("{}; fallback: {}", primary_reason, message),
                302,
            )),
            loaded => loaded,
        }
    }
}

/// A document file that could not be read.
fn unreadable(path: impl std::fmt::Display, reason: String, code: u32) -> DbError {
    DbError::FileError {
        message: reason,
        path: path.to_string(),
        hint: Some("Check that the document file exists and is readable".into()),
        code: Some(code),
    }
}

impl TryFrom<serde_json::Value> for Node {
    type Error = DbError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        node_from_json(value, "")
    }
}

/// Expand "~/" against the home directory.
pub fn expand_path(path: &Path) -> Result<PathBuf, DbError> {
    let raw = path.to_string_lossy();
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            DbError::file_error(
                "Could not determine home directory for ~ expansion".into(),
                raw.to_string(),
            )
        })?;
        return Ok(home.join(rest));
    }
    Ok(path.to_path_buf())
}

fn node_from_json(value: serde_json::Value, path: &str) -> Result<Node, DbError> {
    use serde_json::Value as Json;

    let child_path = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", path, key)
        }
    };

    match value {
        Json::String(s) => Ok(Node::String(s)),
        Json::Null => Ok(Node::str("null")),
        Json::Bool(true) => Ok(Node::str("true")),
        Json::Bool(false) => Ok(Node::str("false")),
        Json::Number(n) => n.as_i64().map(Node::Integer).ok_or_else(|| DbError::ParseError {
            message: format!("Unsupported number {} at '{}'", n, path),
            hint: Some("Only integers in the i64 range are supported; quote other numbers".into()),
            code: Some(311),
        }),
        Json::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| node_from_json(item, &child_path(&i.to_string())))
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Sequence),
        Json::Object(entries) => {
            let mut map = Mapping::with_capacity(entries.len());
            for (key, item) in entries {
                let node = node_from_json(item, &child_path(&key))?;
                map.insert(key, node);
            }
            Ok(Node::Mapping(map))
        }
    }
}
