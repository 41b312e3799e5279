//! The paginated list snapshot stored in state

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use silverghost_actions::{FilterCriterion, Node, Pagination, Sorting};

/// First page not yet cached, and when that was computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextPage {
    pub number: Option<u64>,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl NextPage {
    pub fn now(number: Option<u64>) -> Self {
        NextPage {
            number,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Pagination, sorting and filter the snapshot was built with
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PsfState {
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub filter: Vec<FilterCriterion>,
    #[serde(default)]
    pub sorting: Sorting,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResult {
    /// Items of the page just received
    pub page: Vec<Value>,
    /// Every cached page flattened in page order
    pub list: Vec<Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub pages: BTreeMap<u64, Vec<Value>>,
    pub next_page: NextPage,
    pub psf_state: PsfState,
    /// Full payload of an export request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_data: Option<Vec<Value>>,
}

impl ListResult {
    /// Whether `node` has the shape of a list result
    pub fn is_list_result(node: &Node) -> bool {
        ["page", "list", "psfState", "nextPage"]
            .iter()
            .all(|key| node.get(key).is_some_and(|value| !value.is_null()))
    }

    /// Reads a list result out of a node, or `None` when it has another shape.
    ///
    /// A node shaped like a list result whose fields do not deserialize is
    /// an error.
    pub fn from_node(node: &Node) -> Result<Option<Self>, serde_json::Error> {
        if !Self::is_list_result(node) {
            return Ok(None);
        }
        node.deserialize().map(Some)
    }

    pub fn to_node(&self) -> Result<Node, serde_json::Error> {
        Node::from_serialize(self)
    }

    pub fn pagination(&self) -> &Pagination {
        &self.psf_state.pagination
    }
}
