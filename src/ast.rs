use indexmap::IndexMap;

/// Named children of a mapping node, in authored order.
pub type Mapping = IndexMap<String, Node>;

/// An authored node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    String(String),
    Integer(i64),
    Mapping(Mapping),
    Sequence(Vec<Node>),
}

impl Node {
    pub fn str(s: impl Into<String>) -> Self {
        Node::String(s.into())
    }

    /// Build a mapping from `(key, node)` pairs. Later duplicates replace earlier ones.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Node)>,
    {
        Node::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn seq<S, I>(items: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Node::Sequence(items.into_iter().map(|s| Node::String(s.into())).collect())
    }

    /// Build a sequence from an unordered set of strings.
    ///
    /// Items are sorted lexically and de-duplicated so the result never depends on the
    /// order the caller happened to produce them in.
    pub fn set<S, I>(items: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        let mut items: Vec<String> = items.into_iter().map(Into::into).collect();
        items.sort();
        items.dedup();
        Node::Sequence(items.into_iter().map(Node::String).collect())
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        if let Node::Mapping(items) = self {
            Some(items)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Node::String(s) = self {
            Some(s)
        } else {
            None
        }
    }
}

/// An immutable document: the root mapping every lookup starts from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    root: Mapping,
}

impl Document {
    pub fn new(root: Mapping) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Every leaf key path under `prefix` (or the whole document for an empty prefix),
    /// sorted lexically.
    ///
    /// Only authored keys are listed; inherited keys are reachable under many more paths
    /// and are left to the resolver.
    pub fn key_paths(&self, prefix: &str) -> Vec<String> {
        fn collect(map: &Mapping, path: &str, out: &mut Vec<String>) {
            for (key, node) in map {
                let full = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                match node {
                    Node::Mapping(children) => collect(children, &full, out),
                    _ => out.push(full),
                }
            }
        }

        let mut out = Vec::new();
        if prefix.trim().is_empty() {
            collect(&self.root, "", &mut out);
        } else {
            let mut current = &self.root;
            for seg in prefix.split('.') {
                match current.get(seg) {
                    Some(Node::Mapping(children)) => current = children,
                    Some(_) => return vec![prefix.to_string()],
                    None => return out,
                }
            }
            collect(current, prefix, &mut out);
        }
        out.sort();
        out
    }
}

impl From<Mapping> for Document {
    fn from(root: Mapping) -> Self {
        Document::new(root)
    }
}

/// The result of resolving a key path.
///
/// Mappings and sequences are returned as authored: their members are resolved by
/// further lookups, not eagerly.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    String(String),
    Integer(i64),
    Mapping(Mapping),
    Sequence(Vec<Node>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Mapping(_) => "mapping",
            Value::Sequence(_) => "sequence",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_sorted_and_deduplicated() {
        let node = Node::set(["xterm", "flex", "bison", "flex"]);
        assert_eq!(node, Node::seq(["bison", "flex", "xterm"]));
    }

    #[test]
    fn test_key_paths_sorted_and_prefixed() {
        let doc = Document::new(
            [
                ("zeta".to_string(), Node::str("z")),
                (
                    "arm".to_string(),
                    Node::map([("vsn", Node::str("19.01c")), ("rel", Node::str("19.01"))]),
                ),
            ]
            .into_iter()
            .collect(),
        );

        assert_eq!(doc.key_paths(""), vec!["arm.rel", "arm.vsn", "zeta"]);
        assert_eq!(doc.key_paths("arm"), vec!["arm.rel", "arm.vsn"]);
        assert_eq!(doc.key_paths("zeta"), vec!["zeta"]);
        assert!(doc.key_paths("missing").is_empty());
    }
}
