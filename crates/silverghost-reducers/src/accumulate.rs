//! Branch-replacing accumulation into the state tree

use std::sync::Arc;

use silverghost_actions::{ActionDefinition, ActionInstance, Node};

use crate::error::Result;
use crate::pathgroup::{address, is_same_pathgroup};
use crate::reducer::Reducer;

/// Stores each reduction at the tree branch addressed by its params.
///
/// The wrapped reducer sees the addressed branch as its previous state.
/// Its result replaces that branch; sibling branches are carried over
/// untouched (and stay shared with the previous state) as long as the
/// reduction continues the previous one, otherwise the tree starts empty.
pub struct Accumulate<R> {
    inner: R,
}

pub fn accumulate<R: Reducer>(inner: R) -> Accumulate<R> {
    Accumulate { inner }
}

impl<R: Reducer> Accumulate<R> {
    pub fn into_inner(self) -> R {
        self.inner
    }
}

/// Definition an action was built from, or the one its state carries
pub(crate) fn definition_of(
    action: &ActionInstance,
    state: Option<&ActionInstance>,
) -> Option<Arc<ActionDefinition>> {
    action
        .definition
        .clone()
        .or_else(|| state.and_then(|state| state.definition.clone()))
}

impl<R: Reducer> Reducer for Accumulate<R> {
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        let params = action.params_or_empty();

        let branch_state = match (state, definition_of(action, state)) {
            (Some(state), Some(definition)) => {
                let address = address(&definition, params)?;
                Some(ActionInstance {
                    payload: state.payload.get_in(&address.path).cloned().unwrap_or_default(),
                    ..state.clone()
                })
            }
            (state, _) => state.cloned(),
        };

        let Some(mut reduction) = self.inner.reduce(branch_state.as_ref(), action)? else {
            return Ok(None);
        };
        let Some(definition) = reduction.definition.clone().or_else(|| action.definition.clone())
        else {
            return Ok(Some(reduction));
        };

        let address = address(&definition, params)?;
        let mut tree = match state {
            Some(state) if is_same_pathgroup(&address.pathgroup_params, Some(state), &reduction) => {
                state.payload.clone()
            }
            _ => Node::map(),
        };
        tree.set_in(&address.path, std::mem::take(&mut reduction.payload));

        reduction.payload = tree;
        reduction.definition = Some(definition);
        Ok(Some(reduction))
    }

    fn initial_state(&self) -> Option<ActionInstance> {
        self.inner.initial_state()
    }
}
