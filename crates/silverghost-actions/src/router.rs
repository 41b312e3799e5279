//! Action router
//!
//! [`ActionRouter`] is an ordered registry of shared definitions. It resolves
//! the definition an action belongs to (by type, then by path), rewrites
//! navigation events into REQUEST actions and extracts parameters.
//!
//! Registration order is the tie-break: when several templates fit a path,
//! the first registered definition wins.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::definition::ActionDefinition;
use crate::error::{ActionError, Result};
use crate::instance::ActionInstance;
use crate::location::LocationProvider;
use crate::template::pathgroup::PathgroupOptions;
use crate::template::pattern::split_path_parts;

/// Outcome of scanning the registry for a path
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Matched {
        definition: Arc<ActionDefinition>,
        params: Vec<Value>,
    },
    Unmatched,
}

impl MatchOutcome {
    pub fn definition(&self) -> Option<&Arc<ActionDefinition>> {
        match self {
            MatchOutcome::Matched { definition, .. } => Some(definition),
            MatchOutcome::Unmatched => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched { .. })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionRouter {
    definitions: Vec<Arc<ActionDefinition>>,
}

impl ActionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition (builder style)
    ///
    /// # Examples
    ///
    /// ```
    /// use silverghost_actions::{ActionDefinition, ActionRouter};
    ///
    /// let router = ActionRouter::new()
    ///     .with_definition(ActionDefinition::new("@@App/SESSION"))
    ///     .with_definition(ActionDefinition::new("@@App/USER").with_pathname("/users/:id"));
    ///
    /// assert_eq!(router.definitions().len(), 2);
    /// assert!(router.scan_pathname("/users/7").is_matched());
    /// ```
    pub fn with_definition(mut self, definition: ActionDefinition) -> Self {
        self.register(definition);
        self
    }

    /// Registers a definition and returns the shared handle to it
    pub fn register(&mut self, definition: ActionDefinition) -> Arc<ActionDefinition> {
        let definition = Arc::new(definition);
        self.definitions.push(Arc::clone(&definition));
        definition
    }

    pub fn definitions(&self) -> &[Arc<ActionDefinition>] {
        &self.definitions
    }

    /// Looks a definition up by its base type
    pub fn get(&self, action_type: &str) -> Option<&Arc<ActionDefinition>> {
        self.definitions
            .iter()
            .find(|def| def.action_type() == action_type)
    }

    /// First definition whose REQUEST or DATA type equals `action_type`
    pub fn by_type(&self, action_type: &str) -> Option<&Arc<ActionDefinition>> {
        self.definitions
            .iter()
            .find(|def| def.request_type() == action_type || def.data_type() == action_type)
    }

    /// First definition whose template fits `path` and whose pathgroups
    /// accept every value in it.
    ///
    /// Definitions rejecting a value are skipped; an invalid pathgroup
    /// declaration is logged and skipped as well.
    pub fn scan_pathname(&self, path: &str) -> MatchOutcome {
        for definition in &self.definitions {
            if !definition.is_matching(path) {
                continue;
            }
            match definition.pathgroup_params(path, PathgroupOptions::strict()) {
                Ok(params) => {
                    return MatchOutcome::Matched {
                        definition: Arc::clone(definition),
                        params,
                    }
                }
                Err(err) if err.is_recoverable() => {
                    debug!("Skipping {}: {}", definition.action_type(), err);
                }
                Err(err) => {
                    warn!("Skipping {} [{}]: {}", definition.action_type(), err.code(), err);
                }
            }
        }
        MatchOutcome::Unmatched
    }

    /// Resolves the definition `action` was created from: by REQUEST/DATA
    /// type first, then by `payload.location.pathname`.
    pub fn definition_for(&self, action: &ActionInstance) -> Option<Arc<ActionDefinition>> {
        if let Some(definition) = self.by_type(&action.action_type) {
            return Some(Arc::clone(definition));
        }
        action
            .pathname()
            .and_then(|path| self.scan_pathname(path).definition().cloned())
    }

    /// Rewrites a `LOCATION_CHANGE` event into the REQUEST action of the
    /// definition its path matches. Other actions are returned unchanged.
    pub fn match_event(&self, action: &ActionInstance) -> ActionInstance {
        let mut matching = action.clone();
        if action.is_location_change() {
            if let Some(definition) = self.definition_for(action) {
                debug!(
                    "Routing {} to {}",
                    action.pathname().unwrap_or_default(),
                    definition.request_type()
                );
                matching.action_type = definition.request_type().to_string();
                matching.definition = Some(definition);
            }
        }
        matching
    }

    /// Parameters of `action`.
    ///
    /// Explicit `params` are returned as they are. Otherwise they are derived
    /// from the action's own location (or the ambient one when it carries
    /// none): path and hash values first, then the query-string tokens.
    pub fn params(
        &self,
        action: &ActionInstance,
        location: &dyn LocationProvider,
    ) -> Result<Vec<Value>> {
        let Some(definition) = self.definition_for(action) else {
            return Ok(Vec::new());
        };
        if let Some(params) = &action.params {
            return Ok(params.clone());
        }

        let location = action
            .location()
            .unwrap_or_else(|| location.current_location());
        let mut params =
            definition.pathgroup_params(&location.path_with_hash(), PathgroupOptions::all())?;
        params.extend(location.query_tokens().into_iter().map(Value::String));
        Ok(params)
    }

    /// Value of the parametric segment `key` for `action`.
    ///
    /// Fails with [`ActionError::MissingPathname`] when the action's
    /// definition has no template to name its segments.
    ///
    /// With `router_path`, the values are read positionally from that path
    /// instead of the definition's own resolution (for a router mounted
    /// under a different shape). Trailing query params keep their place
    /// after the path values.
    pub fn extract_param(
        &self,
        action: &ActionInstance,
        key: &str,
        router_path: Option<&str>,
        location: &dyn LocationProvider,
    ) -> Result<Option<Value>> {
        let params = self.params(action, location)?;
        if params.is_empty() {
            return Ok(None);
        }
        let Some(definition) = self.definition_for(action) else {
            return Ok(None);
        };
        let template = definition
            .template()
            .ok_or_else(|| ActionError::MissingPathname(definition.action_type().to_string()))?;
        let Some(index) = template.param_position(key) else {
            return Ok(None);
        };

        let pathname = definition.pathname_for(&params, "");
        let group = definition.pathgroup_params(&pathname, PathgroupOptions::all())?;
        let query_params = params.iter().skip(group.len()).cloned();

        let mut all: Vec<Value> = match router_path {
            Some(path) => split_path_parts(path)
                .into_iter()
                .map(|part| Value::String(part.to_string()))
                .collect(),
            None => group,
        };
        all.extend(query_params);

        Ok(all.get(index).cloned())
    }
}
