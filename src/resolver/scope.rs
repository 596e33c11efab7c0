use crate::ast::{Document, Mapping, Node};

/// Keys visible at one point of a walk.
///
/// Each mapping entered on the way down is pushed as a layer. Lookups search the
/// innermost layer first and fall back outwards to the document root, so the nearest
/// declaration of a key always wins.
#[derive(Debug, Clone)]
pub struct Scope<'d> {
    layers: Vec<&'d Mapping>,
}

impl<'d> Scope<'d> {
    pub fn root(document: &'d Document) -> Self {
        Self {
            layers: vec![document.root()],
        }
    }

    /// Layers `mapping` on top: its keys shadow everything inherited so far.
    pub fn enter(&mut self, mapping: &'d Mapping) {
        self.layers.push(mapping);
    }

    pub fn get(&self, key: &str) -> Option<&'d Node> {
        self.layers.iter().rev().find_map(|layer| layer.get(key))
    }

    /// Number of layers, the document root included.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> Document {
        let Node::Mapping(root) = Node::map([
            ("surname", Node::str("Smith")),
            ("alexa", Node::map([("surname", Node::str("Smith-Doe"))])),
            ("john", Node::map([("name", Node::str("John"))])),
        ]) else {
            unreachable!()
        };
        Document::new(root)
    }

    #[test]
    fn test_nearest_layer_wins() {
        let doc = people();
        let mut scope = Scope::root(&doc);
        assert_eq!(scope.get("surname"), Some(&Node::str("Smith")));

        let alexa = doc.root()["alexa"].as_mapping().unwrap();
        scope.enter(alexa);
        assert_eq!(scope.depth(), 2);
        assert_eq!(scope.get("surname"), Some(&Node::str("Smith-Doe")));
        assert!(scope.get("john").is_some());
        assert!(scope.get("missing").is_none());
    }

    #[test]
    fn test_clone_is_independent() {
        let doc = people();
        let root = Scope::root(&doc);
        let mut inner = root.clone();
        inner.enter(doc.root()["john"].as_mapping().unwrap());

        assert_eq!(inner.get("name"), Some(&Node::str("John")));
        assert!(root.get("name").is_none());
    }
}
