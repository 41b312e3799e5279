//! Action instances and list metadata
//!
//! An [`ActionInstance`] is the transient value dispatched through the
//! router and the reducers. Its `type` carries one of the kind suffixes
//! (`_REQUEST`, `_DATA`, `_ERROR`) appended to a definition's base type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::definition::ActionDefinition;
use crate::location::{Location, LOCATION_CHANGE};
use crate::payload::Node;

/// The three kinds every action definition dispatches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Request,
    Data,
    Error,
}

impl ActionKind {
    pub const ALL: [ActionKind; 3] = [ActionKind::Request, ActionKind::Data, ActionKind::Error];

    /// Suffix appended to the base type
    pub fn suffix(&self) -> &'static str {
        match self {
            ActionKind::Request => "_REQUEST",
            ActionKind::Data => "_DATA",
            ActionKind::Error => "_ERROR",
        }
    }

    /// Kind encoded in the suffix of `action_type`, if any
    pub fn from_type(action_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| action_type.ends_with(kind.suffix()))
    }
}

/// Page coordinates of a list request or result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_elements: Option<u64>,
}

impl Pagination {
    pub fn new(number: u64, size: u64) -> Self {
        Pagination {
            number: Some(number),
            size: Some(size),
            total_elements: None,
        }
    }

    pub fn with_total(mut self, total_elements: u64) -> Self {
        self.total_elements = Some(total_elements);
        self
    }

    /// True when number, size and total are all known
    pub fn is_complete(&self) -> bool {
        self.number.is_some() && self.size.is_some() && self.total_elements.is_some()
    }

    /// Number of pages implied by size and total, rounded up
    pub fn page_count(&self) -> Option<u64> {
        match (self.size, self.total_elements) {
            (Some(size), Some(total)) if size > 0 => Some(total.div_ceil(size)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
    #[default]
    #[serde(rename = "")]
    Unsorted,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
            SortDirection::Unsorted => "",
        }
    }
}

/// `[columnName, direction]`; an unsorted list is `[null, ""]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sorting(pub Option<String>, pub SortDirection);

impl Sorting {
    pub fn by(column: impl Into<String>, direction: SortDirection) -> Self {
        Sorting(Some(column.into()), direction)
    }

    pub fn column(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.1
    }
}

/// One filter entry of a list request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriterion {
    pub column_name: String,
    #[serde(default)]
    pub operation: String,
    #[serde(default)]
    pub value: Value,
}

impl FilterCriterion {
    pub fn new(column_name: impl Into<String>, operation: impl Into<String>, value: Value) -> Self {
        FilterCriterion {
            column_name: column_name.into(),
            operation: operation.into(),
            value,
        }
    }
}

/// A dispatched action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionInstance {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<Value>>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<Sorting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<FilterCriterion>>,
    #[serde(default)]
    pub payload: Node,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_data: Option<bool>,
    /// Definition the action was built from or matched against
    #[serde(skip)]
    pub definition: Option<Arc<ActionDefinition>>,
}

impl ActionInstance {
    pub fn new(action_type: impl Into<String>) -> Self {
        ActionInstance {
            action_type: action_type.into(),
            ..Default::default()
        }
    }

    /// Builds the generic navigation event for `location`
    ///
    /// ```
    /// use silverghost_actions::{ActionInstance, Location};
    ///
    /// let event = ActionInstance::location_change(&Location::parse("/welcome/room"));
    /// assert!(event.is_location_change());
    /// assert_eq!(event.pathname(), Some("/welcome/room"));
    /// ```
    pub fn location_change(location: &Location) -> Self {
        let mut payload = Node::map();
        payload.insert("location", location.to_node());
        ActionInstance::new(LOCATION_CHANGE).with_payload(payload)
    }

    pub fn with_params(mut self, params: Vec<Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_payload(mut self, payload: impl Into<Node>) -> Self {
        self.payload = payload.into();
        self
    }

    pub fn with_definition(mut self, definition: Arc<ActionDefinition>) -> Self {
        self.definition = Some(definition);
        self
    }

    pub fn is_location_change(&self) -> bool {
        self.action_type == LOCATION_CHANGE
    }

    pub fn kind(&self) -> Option<ActionKind> {
        ActionKind::from_type(&self.action_type)
    }

    pub fn params_or_empty(&self) -> &[Value] {
        self.params.as_deref().unwrap_or(&[])
    }

    pub fn is_export(&self) -> bool {
        self.export_data.unwrap_or(false)
    }

    /// `payload.location`, when the payload carries one
    pub fn location(&self) -> Option<Location> {
        self.payload.get("location").and_then(Location::from_node)
    }

    /// `payload.location.pathname`
    pub fn pathname(&self) -> Option<&str> {
        self.payload
            .get_in(&["location", "pathname"])
            .and_then(Node::as_str)
    }
}
