//! Leaf reducers

use std::sync::Arc;

use silverghost_actions::{ActionDefinition, ActionInstance, ActionKind};
use tracing::error;

use crate::error::Result;
use crate::reducer::Reducer;

/// Takes a DATA action of one of its definitions as the new state.
///
/// The resulting state carries the definition it matched.
#[derive(Debug, Clone, Default)]
pub struct DefaultReducer {
    initial: Option<ActionInstance>,
    definitions: Vec<Arc<ActionDefinition>>,
}

impl DefaultReducer {
    pub fn new<I>(initial: Option<ActionInstance>, definitions: I) -> Self
    where
        I: IntoIterator<Item = Arc<ActionDefinition>>,
    {
        DefaultReducer {
            initial,
            definitions: definitions.into_iter().collect(),
        }
    }
}

/// First definition whose DATA type is `action`'s type
pub(crate) fn data_definition<'a>(
    definitions: &'a [Arc<ActionDefinition>],
    action: &ActionInstance,
) -> Option<&'a Arc<ActionDefinition>> {
    definitions
        .iter()
        .find(|definition| definition.data_type() == action.action_type)
}

impl Reducer for DefaultReducer {
    fn reduce(
        &self,
        _state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        Ok(data_definition(&self.definitions, action)
            .map(|definition| action.clone().with_definition(Arc::clone(definition))))
    }

    fn initial_state(&self) -> Option<ActionInstance> {
        self.initial.clone()
    }
}

/// Logs the payload of every `*_ERROR` action. Never reduces.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorLogReducer;

impl Reducer for ErrorLogReducer {
    fn reduce(
        &self,
        _state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        if action.kind() == Some(ActionKind::Error) {
            error!(
                action = %action.action_type,
                payload = %action.payload.to_value(),
                "Action failed"
            );
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use silverghost_actions::InstanceProperties;

    fn session() -> Arc<ActionDefinition> {
        Arc::new(ActionDefinition::new("@@App/SESSION"))
    }

    #[test]
    fn test_default_reduces_data_only() {
        let def = session();
        let reducer = DefaultReducer::new(None, [Arc::clone(&def)]);

        let data = def.instance(InstanceProperties::data().params(vec![]).payload(json!({"user": "ann"})));
        let reduced = reducer.reduce(None, &data).unwrap().unwrap();
        assert_eq!(reduced.payload, data.payload);
        assert_eq!(reduced.definition.as_deref(), Some(&*def));

        let request = def.instance(InstanceProperties::request().params(vec![]));
        assert_eq!(reducer.reduce(None, &request).unwrap(), None);
    }

    #[test]
    fn test_default_initial_state() {
        let def = session();
        let initial = def.instance(InstanceProperties::data().params(vec![]).payload(json!({})));
        let reducer = DefaultReducer::new(Some(initial.clone()), [def]);
        assert_eq!(reducer.initial_state(), Some(initial));
    }

    #[test]
    fn test_error_log_never_reduces() {
        let def = session();
        let failure = def.instance(InstanceProperties::error().params(vec![]).payload(json!("boom")));
        assert_eq!(ErrorLogReducer.reduce(None, &failure).unwrap(), None);
    }
}
