//! Navigation locations
//!
//! A [`Location`] is the `pathname + search + hash` triple a navigation event
//! carries. The router reads it from a `LOCATION_CHANGE` payload, or from a
//! [`LocationProvider`] when an action carries none.

use serde::{Deserialize, Serialize};

use crate::payload::Node;
use crate::query;

/// Type of the generic navigation event
pub const LOCATION_CHANGE: &str = "@@router/LOCATION_CHANGE";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub pathname: String,
    /// Query string including its leading `?`, or empty
    #[serde(default)]
    pub search: String,
    /// Fragment including its leading `#`, or empty
    #[serde(default)]
    pub hash: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Location {
            pathname: pathname.into(),
            ..Default::default()
        }
    }

    /// Splits a URL path into pathname, search and hash
    ///
    /// # Examples
    ///
    /// ```
    /// use silverghost_actions::Location;
    ///
    /// let location = Location::parse("/welcome/room?q=hi#top");
    /// assert_eq!(location.pathname, "/welcome/room");
    /// assert_eq!(location.search, "?q=hi");
    /// assert_eq!(location.hash, "#top");
    /// ```
    pub fn parse(url: &str) -> Self {
        let (rest, hash) = match url.find('#') {
            Some(index) => url.split_at(index),
            None => (url, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(index) => rest.split_at(index),
            None => (rest, ""),
        };
        Location {
            pathname: if pathname.is_empty() { "/" } else { pathname }.to_string(),
            search: search.to_string(),
            hash: hash.to_string(),
        }
    }

    /// Pathname followed by the hash; hash-delimited parameters live here
    pub fn path_with_hash(&self) -> String {
        format!("{}{}", self.pathname, self.hash)
    }

    /// Non-empty tokens of the query string
    pub fn query_tokens(&self) -> Vec<String> {
        query::parse_query(&self.search)
    }

    pub fn to_node(&self) -> Node {
        [
            ("pathname", &self.pathname),
            ("search", &self.search),
            ("hash", &self.hash),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), Node::from(value.as_str())))
        .collect()
    }

    /// Reads a location out of a `{pathname, search, hash}` node.
    ///
    /// Returns `None` unless the node carries a string `pathname`.
    pub fn from_node(node: &Node) -> Option<Self> {
        let text = |key: &str| node.get(key).and_then(Node::as_str).map(str::to_string);
        Some(Location {
            pathname: text("pathname")?,
            search: text("search").unwrap_or_default(),
            hash: text("hash").unwrap_or_default(),
        })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.pathname, self.search, self.hash)
    }
}

/// Source of the ambient "current location"
pub trait LocationProvider {
    fn current_location(&self) -> Location;
}

impl LocationProvider for Location {
    fn current_location(&self) -> Location {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_path() {
        let location = Location::parse("/tree/a");
        assert_eq!(location, Location::new("/tree/a"));
    }

    #[test]
    fn test_parse_hash_before_query() {
        let location = Location::parse("/tree#a?b");
        assert_eq!(location.pathname, "/tree");
        assert_eq!(location.search, "");
        assert_eq!(location.hash, "#a?b");
    }

    #[test]
    fn test_parse_empty_is_root() {
        assert_eq!(Location::parse("").pathname, "/");
        assert_eq!(Location::parse("?x").pathname, "/");
    }

    #[test]
    fn test_node_round_trip() {
        let location = Location::parse("/welcome/room?q=hi");
        assert_eq!(Location::from_node(&location.to_node()), Some(location));
    }

    #[test]
    fn test_display() {
        assert_eq!(Location::parse("/a?b#c").to_string(), "/a?b#c");
    }
}
