//! Persistent payload tree
//!
//! Action payloads and the state trees built from them are [`Node`] values: a
//! JSON-shaped enum whose maps and lists sit behind `Arc`. Cloning a node is a
//! pointer copy; writing through [`Node::map_mut`] or [`Node::set_in`] copies
//! only the branches on the written path (`Arc::make_mut`), so every untouched
//! sibling stays shared with the state it came from.
//!
//! ```
//! use silverghost_actions::Node;
//! use serde_json::json;
//!
//! let before = Node::from(json!({"room": {"n": 1}, "broadcast": {"n": 2}}));
//! let mut after = before.clone();
//! after.set_in(&["broadcast".to_string()], Node::from(json!({"n": 3})));
//!
//! assert!(after.get("room").unwrap().shares_with(before.get("room").unwrap()));
//! assert_eq!(after.get_in(&["broadcast", "n"]), Some(&Node::from(json!(3))));
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// A JSON-shaped value with structurally shared branches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Arc<Vec<Node>>),
    Map(Arc<BTreeMap<String, Node>>),
}

impl Node {
    /// An empty map node
    pub fn map() -> Self {
        Node::Map(Arc::new(BTreeMap::new()))
    }

    /// A list node owning the given items
    pub fn list(items: Vec<Node>) -> Self {
        Node::List(Arc::new(items))
    }

    /// Converts any serializable value into a node
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Node::from)
    }

    /// Reads the node back into a typed value
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }

    pub fn to_value(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.clone()),
            Node::List(items) => Value::Array(items.iter().map(Node::to_value).collect()),
            Node::Map(map) => Value::Object(
                map.iter()
                    .map(|(key, node)| (key.clone(), node.to_value()))
                    .collect(),
            ),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Node::Map(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List(_))
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map.as_ref()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Looks up a key of a map node
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Looks up a position of a list node
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        self.as_list().and_then(|items| items.get(index))
    }

    /// Descends through nested map keys
    pub fn get_in<S: AsRef<str>>(&self, path: &[S]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, key| node.get(key.as_ref()))
    }

    /// Mutable access to the map, copying it first if it is shared.
    ///
    /// A node that is not a map is replaced by an empty one.
    pub fn map_mut(&mut self) -> &mut BTreeMap<String, Node> {
        if !self.is_map() {
            *self = Node::map();
        }
        match self {
            Node::Map(map) => Arc::make_mut(map),
            _ => unreachable!("node was just replaced by a map"),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        self.map_mut().insert(key.into(), node)
    }

    /// Writes `leaf` at `path`, creating or copying every intermediate map.
    ///
    /// Only the maps along `path` are copied; their other entries keep
    /// pointing at the same shared branches. An empty path replaces the node.
    pub fn set_in<S: AsRef<str>>(&mut self, path: &[S], leaf: Node) {
        match path.split_first() {
            None => *self = leaf,
            Some((head, rest)) => self
                .map_mut()
                .entry(head.as_ref().to_string())
                .or_default()
                .set_in(rest, leaf),
        }
    }

    /// True when both nodes point at the same shared branch
    pub fn shares_with(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Map(a), Node::Map(b)) => Arc::ptr_eq(a, b),
            (Node::List(a), Node::List(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Recursively merges `next` over `prev`.
    ///
    /// Keys only present in `prev` are carried across (shared, not copied);
    /// keys present on both sides are merged when both values are maps and
    /// otherwise taken from `next`. A non-map on either side yields `next`.
    pub fn deep_merge(prev: &Node, next: &Node) -> Node {
        let (Node::Map(prev_map), Node::Map(next_map)) = (prev, next) else {
            return next.clone();
        };
        if Arc::ptr_eq(prev_map, next_map) {
            return next.clone();
        }

        let mut merged = (**next_map).clone();
        for (key, prev_value) in prev_map.iter() {
            match merged.get_mut(key) {
                None => {
                    merged.insert(key.clone(), prev_value.clone());
                }
                Some(next_value) if prev_value.is_map() && next_value.is_map() => {
                    *next_value = Node::deep_merge(prev_value, next_value);
                }
                Some(_) => {}
            }
        }
        Node::Map(Arc::new(merged))
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(s),
            Value::Array(items) => Node::list(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Map(Arc::new(
                map.into_iter()
                    .map(|(key, value)| (key, Node::from(value)))
                    .collect(),
            )),
        }
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        node.to_value()
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Number(n.into())
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::list(items)
    }
}

impl FromIterator<(String, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Node::Map(Arc::new(iter.into_iter().collect()))
    }
}
