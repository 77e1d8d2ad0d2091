//! Schema-less tree produced by the XML loader.
//!
//! DatexII documents are consumed without a fixed schema, so every stage
//! walks this tree through the lookup helpers below instead of typed structs.

use serde_json::{Map, Value};

/// One node of the loaded document.
///
/// Mappings keep document order. Keys follow the XML-to-dict convention:
/// `@name` for attributes and `#text` for text that sits beside attributes
/// or child elements.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    #[default]
    Null,
    Scalar(String),
    Sequence(Vec<Node>),
    Mapping(Vec<(String, Node)>),
}

static NULL: Node = Node::Null;

impl Node {
    /// Looks up `key` when this node is a mapping.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Like [`Node::get`], but a missing key reads as [`Node::Null`].
    pub fn field(&self, key: &str) -> &Node {
        self.get(key).unwrap_or(&NULL)
    }

    /// Follows a chain of mapping keys. Returns `None` as soon as a link is
    /// missing or the current node is not a mapping.
    pub fn path(&self, keys: &[&str]) -> Option<&Node> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Text stored under `#text` of a mapping.
    pub fn text(&self) -> Option<&str> {
        self.get("#text").and_then(Node::as_str)
    }

    /// Removes `key`, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        match self {
            Node::Mapping(entries) => {
                let idx = entries.iter().position(|(k, _)| k == key)?;
                Some(entries.remove(idx).1)
            }
            _ => None,
        }
    }
}

fn insert_entry(entries: &mut Vec<(String, Node)>, key: String, value: Node) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some((_, slot)) => *slot = value,
        None => entries.push((key, value)),
    }
}

/// Views a possibly-repeated field as a list.
///
/// The loader collapses a single child element into a plain node, so every
/// multi-valued field goes through here before iteration.
pub fn to_sequence(node: &Node) -> Vec<&Node> {
    match node {
        Node::Null => Vec::new(),
        Node::Sequence(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Owned counterpart of [`to_sequence`].
pub fn into_sequence(node: Node) -> Vec<Node> {
    match node {
        Node::Null => Vec::new(),
        Node::Sequence(items) => items,
        other => vec![other],
    }
}

/// Removes the namespace prefix (everything up to and including the first
/// `:`) from every mapping key in the tree.
///
/// Two keys that strip to the same name collide; the later one wins and
/// keeps the earlier one's position.
pub fn strip_namespaces(node: Node) -> Node {
    match node {
        Node::Mapping(entries) => {
            let mut stripped = Vec::with_capacity(entries.len());
            for (key, value) in entries {
                let key = local_name(&key).to_string();
                insert_entry(&mut stripped, key, strip_namespaces(value));
            }
            Node::Mapping(stripped)
        }
        Node::Sequence(items) => Node::Sequence(items.into_iter().map(strip_namespaces).collect()),
        other => other,
    }
}

fn local_name(key: &str) -> &str {
    match key.split_once(':') {
        Some((_, rest)) => rest,
        None => key,
    }
}

/// Converts the tree into JSON, keeping mapping order.
pub fn to_json(node: &Node) -> Value {
    match node {
        Node::Null => Value::Null,
        Node::Scalar(s) => Value::String(s.clone()),
        Node::Sequence(items) => Value::Array(items.iter().map(to_json).collect()),
        Node::Mapping(entries) => {
            let map: Map<String, Value> = entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect();
            Value::Object(map)
        }
    }
}
