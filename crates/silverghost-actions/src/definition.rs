//! Action definitions
//!
//! An [`ActionDefinition`] pairs a base action type with an optional path
//! template and its pathgroups. Definitions are built once at startup
//! (usually through the builder methods or the facade's configuration) and
//! shared behind `Arc` by the router and by every instance they produce.

use std::sync::Arc;

use serde_json::Value;
use tracing::error;

use crate::error::Result;
use crate::instance::{ActionInstance, ActionKind, FilterCriterion, Pagination, Sorting};
use crate::payload::Node;
use crate::template::pathgroup::{self, PathgroupOptions, PathgroupValue, Pathgroups};
use crate::template::PathTemplate;

/// Static description of one family of actions
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDefinition {
    action_type: String,
    request_type: String,
    data_type: String,
    error_type: String,
    reducer_key: Option<String>,
    template: Option<PathTemplate>,
    pathgroups: Pathgroups,
}

/// Overrides accepted by [`ActionDefinition::instance`] and
/// [`ActionDefinition::propagate`]
#[derive(Debug, Clone, Default)]
pub struct InstanceProperties {
    /// Defaults to [`ActionKind::Data`]
    pub kind: Option<ActionKind>,
    pub params: Option<Vec<Value>>,
    pub pagination: Option<Pagination>,
    pub sorting: Option<Sorting>,
    pub filter: Option<Vec<FilterCriterion>>,
    pub payload: Option<Node>,
    pub export_data: Option<bool>,
}

impl InstanceProperties {
    pub fn request() -> Self {
        Self::of_kind(ActionKind::Request)
    }

    pub fn data() -> Self {
        Self::of_kind(ActionKind::Data)
    }

    pub fn error() -> Self {
        Self::of_kind(ActionKind::Error)
    }

    fn of_kind(kind: ActionKind) -> Self {
        InstanceProperties {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn params(mut self, params: Vec<Value>) -> Self {
        self.params = Some(params);
        self
    }

    pub fn payload(mut self, payload: impl Into<Node>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn sorting(mut self, sorting: Sorting) -> Self {
        self.sorting = Some(sorting);
        self
    }

    pub fn filter(mut self, filter: Vec<FilterCriterion>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn export_data(mut self, export_data: bool) -> Self {
        self.export_data = Some(export_data);
        self
    }
}

impl ActionDefinition {
    /// Creates a definition for `action_type` (by convention `@@App/NAME`)
    ///
    /// # Examples
    ///
    /// ```
    /// use silverghost_actions::{ActionDefinition, PathgroupValue};
    ///
    /// let welcome = ActionDefinition::new("@@App/WELCOME")
    ///     .with_reducer_key("welcome")
    ///     .with_pathname("/welcome/:channel/:query")
    ///     .with_pathgroup("channel", PathgroupValue::options(["room", "broadcast"]));
    ///
    /// assert_eq!(welcome.request_type(), "@@App/WELCOME_REQUEST");
    /// assert!(welcome.is_matching("/welcome/room"));
    /// assert_eq!(welcome.route_path(&[]).as_deref(), Some("/welcome/:channel"));
    /// ```
    pub fn new(action_type: impl Into<String>) -> Self {
        let action_type = action_type.into();
        ActionDefinition {
            request_type: format!("{}{}", action_type, ActionKind::Request.suffix()),
            data_type: format!("{}{}", action_type, ActionKind::Data.suffix()),
            error_type: format!("{}{}", action_type, ActionKind::Error.suffix()),
            action_type,
            reducer_key: None,
            template: None,
            pathgroups: Pathgroups::new(),
        }
    }

    /// Sets the key of the state slice this definition reduces into
    pub fn with_reducer_key(mut self, key: impl Into<String>) -> Self {
        self.reducer_key = Some(key.into());
        self
    }

    /// Sets the path template
    pub fn with_pathname(mut self, pathname: &str) -> Self {
        self.template = Some(PathTemplate::parse(pathname));
        self
    }

    /// Declares the legal values of one parametric segment
    pub fn with_pathgroup(mut self, key: impl Into<String>, value: PathgroupValue) -> Self {
        self.pathgroups.insert(key.into(), value);
        self
    }

    pub fn with_pathgroups(mut self, pathgroups: Pathgroups) -> Self {
        self.pathgroups.extend(pathgroups);
        self
    }

    /// Base type without kind suffix
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    pub fn request_type(&self) -> &str {
        &self.request_type
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    /// Full type for `kind`
    pub fn type_for(&self, kind: ActionKind) -> &str {
        match kind {
            ActionKind::Request => &self.request_type,
            ActionKind::Data => &self.data_type,
            ActionKind::Error => &self.error_type,
        }
    }

    /// Kind of `action_type` when it belongs to this definition
    pub fn kind_of(&self, action_type: &str) -> Option<ActionKind> {
        ActionKind::ALL
            .into_iter()
            .find(|kind| self.type_for(*kind) == action_type)
    }

    pub fn reducer_key(&self) -> Option<&str> {
        self.reducer_key.as_deref()
    }

    pub fn pathname(&self) -> Option<&str> {
        self.template.as_ref().map(PathTemplate::as_str)
    }

    pub fn template(&self) -> Option<&PathTemplate> {
        self.template.as_ref()
    }

    pub fn pathgroups(&self) -> &Pathgroups {
        &self.pathgroups
    }

    /// Number of pathgroup-declared (implicit) segments
    pub fn implicit_count(&self) -> usize {
        self.pathgroups.len()
    }

    /// Whether `path` fits the template. A definition without a template
    /// never matches.
    pub fn is_matching(&self, path: &str) -> bool {
        self.template
            .as_ref()
            .is_some_and(|template| template.is_matching(path, self.implicit_count()))
    }

    /// Resolves the parameters `path` carries for this definition.
    ///
    /// Implicit values outside the declared options either default to the
    /// first option of their level or, with `fail_on_mismatch`, produce
    /// [`ActionError::PathgroupMismatch`](crate::ActionError::PathgroupMismatch).
    pub fn pathgroup_params(&self, path: &str, options: PathgroupOptions) -> Result<Vec<Value>> {
        match &self.template {
            Some(template) => {
                pathgroup::resolve(&self.action_type, template, &self.pathgroups, path, options)
            }
            None => Ok(Vec::new()),
        }
    }

    /// Builds a concrete path by filling the template with `params`.
    ///
    /// Params beyond the template's slots are appended to `query_string`.
    pub fn pathname_for(&self, params: &[Value], query_string: &str) -> String {
        match &self.template {
            Some(template) => template.fill(params, query_string),
            None if query_string.is_empty() || query_string.starts_with('?') => {
                query_string.to_string()
            }
            None => format!("?{query_string}"),
        }
    }

    /// Minimal route pattern for registering this definition with an
    /// external router, or `None` without a template.
    pub fn route_path(&self, query_params: &[&str]) -> Option<String> {
        self.template
            .as_ref()
            .map(|template| template.route_path(self.implicit_count(), query_params))
    }

    /// Builds an action of this definition.
    ///
    /// Missing `params` are logged; pass an empty vector to state that the
    /// action has none. Without a payload, the action carries the location
    /// its params describe.
    pub fn instance(self: &Arc<Self>, properties: InstanceProperties) -> ActionInstance {
        let kind = properties.kind.unwrap_or(ActionKind::Data);
        let action_type = self.type_for(kind).to_string();

        if properties.params.is_none() {
            error!(
                "No parameters specified for the action {}. If you intend to use no parameters, \
                 please set an empty vector as value for the \"params\" field",
                action_type
            );
        }

        let payload = properties.payload.unwrap_or_else(|| {
            let pathname = self.pathname_for(properties.params.as_deref().unwrap_or(&[]), "");
            let mut location = Node::map();
            location.insert("pathname", Node::from(pathname));
            let mut payload = Node::map();
            payload.insert("location", location);
            payload
        });

        ActionInstance {
            action_type,
            params: properties.params,
            pagination: properties.pagination.unwrap_or_default(),
            sorting: properties.sorting,
            filter: properties.filter,
            payload,
            export_data: properties.export_data,
            definition: Some(Arc::clone(self)),
        }
    }

    /// Builds an action that carries over `previous`'s params, list state and
    /// payload, then applies `properties` on top.
    pub fn propagate(
        self: &Arc<Self>,
        previous: &ActionInstance,
        properties: InstanceProperties,
    ) -> ActionInstance {
        self.instance(InstanceProperties {
            kind: properties.kind,
            params: properties
                .params
                .or_else(|| Some(previous.params.clone().unwrap_or_default())),
            pagination: properties
                .pagination
                .or_else(|| Some(previous.pagination.clone())),
            sorting: properties.sorting.or_else(|| previous.sorting.clone()),
            filter: properties.filter.or_else(|| previous.filter.clone()),
            payload: properties.payload.or_else(|| Some(previous.payload.clone())),
            export_data: properties.export_data.or(previous.export_data),
        })
    }
}
