//! `chain` and `split`
//!
//! Both compose boxed reducers: `chain` tries them in order on one payload,
//! `split` hands each one its own slot of a list payload.

use std::sync::Arc;

use silverghost_actions::{ActionDefinition, ActionInstance, Node};
use tracing::{debug, error};

use crate::error::Result;
use crate::reducer::Reducer;

/// Applies reducers in registration order; the first one that reduces wins.
#[derive(Default)]
pub struct Chain {
    reducers: Vec<Box<dyn Reducer>>,
}

pub fn chain(reducers: Vec<Box<dyn Reducer>>) -> Chain {
    Chain { reducers }
}

impl Chain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<R: Reducer + 'static>(mut self, reducer: R) -> Self {
        self.reducers.push(Box::new(reducer));
        self
    }
}

impl Reducer for Chain {
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        for reducer in &self.reducers {
            if let Some(reduction) = reducer.reduce(state, action)? {
                return Ok(Some(reduction));
            }
        }
        Ok(None)
    }

    fn initial_state(&self) -> Option<ActionInstance> {
        self.reducers.iter().find_map(|reducer| reducer.initial_state())
    }
}

/// Reduces a list payload slot by slot, `reducers[i]` on `payload[i]`.
///
/// Only DATA actions of the given definitions are split, and only when the
/// payload has exactly one element per reducer. Otherwise nothing is
/// reduced, except that without a previous state the merged initial states
/// of all reducers are returned (see [`Split::fallback`]).
pub struct Split {
    definitions: Vec<Arc<ActionDefinition>>,
    reducers: Vec<Box<dyn Reducer>>,
}

pub fn split<I>(definitions: I, reducers: Vec<Box<dyn Reducer>>) -> Split
where
    I: IntoIterator<Item = Arc<ActionDefinition>>,
{
    Split {
        definitions: definitions.into_iter().collect(),
        reducers,
    }
}

impl Split {
    pub fn new<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = Arc<ActionDefinition>>,
    {
        split(definitions, Vec::new())
    }

    pub fn with<R: Reducer + 'static>(mut self, reducer: R) -> Self {
        self.reducers.push(Box::new(reducer));
        self
    }

    /// Result when the action is not split: the merged initial states
    /// without a previous state, no reduction with one.
    // TODO: confirm with product whether a first reduction should really
    // differ from later ones here before relying on either branch.
    fn fallback(&self, state: Option<&ActionInstance>) -> Option<ActionInstance> {
        match state {
            None => self.merged_initial_states(),
            Some(_) => None,
        }
    }

    /// Initial states of all reducers, later ones overriding earlier ones
    /// and payloads deep-merged in order
    fn merged_initial_states(&self) -> Option<ActionInstance> {
        self.reducers
            .iter()
            .filter_map(|reducer| reducer.initial_state())
            .reduce(|merged, next| ActionInstance {
                payload: Node::deep_merge(&merged.payload, &next.payload),
                ..next
            })
    }
}

impl Reducer for Split {
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        let Some(definition) = self.definitions.iter().find(|definition| {
            definition.data_type() == action.action_type
                || definition.request_type() == action.action_type
        }) else {
            return Ok(self.fallback(state));
        };
        if definition.data_type() != action.action_type {
            return Ok(self.fallback(state));
        }

        let responses = match action.payload.as_list() {
            Some(responses) if responses.len() == self.reducers.len() => responses,
            Some(responses) => {
                error!(
                    "Cannot reduce action {}: registered {} reducers but receiving {} responses in the action payload",
                    action.action_type,
                    self.reducers.len(),
                    responses.len()
                );
                return Ok(self.fallback(state));
            }
            None => {
                debug!("Not splitting {}: payload is not a list", action.action_type);
                return Ok(self.fallback(state));
            }
        };

        let previous = state.and_then(|state| state.payload.as_list());
        let mut slots = Vec::with_capacity(responses.len());

        for (index, (reducer, response)) in self.reducers.iter().zip(responses).enumerate() {
            let previous_slot = previous
                .and_then(|previous| previous.get(index))
                .filter(|slot| !slot.is_null())
                .cloned()
                .unwrap_or_else(Node::map);
            if response.is_null() {
                slots.push(previous_slot);
                continue;
            }

            let slot_state = state.map(|state| ActionInstance {
                payload: previous_slot.clone(),
                ..state.clone()
            });
            let slot_action = ActionInstance {
                payload: response.clone(),
                definition: Some(Arc::clone(definition)),
                ..action.clone()
            };

            match reducer.reduce(slot_state.as_ref(), &slot_action)? {
                Some(reduction) => slots.push(reduction.payload),
                None => slots.push(previous_slot),
            }
        }

        Ok(Some(ActionInstance {
            payload: Node::list(slots),
            definition: Some(Arc::clone(definition)),
            ..action.clone()
        }))
    }

    fn initial_state(&self) -> Option<ActionInstance> {
        self.merged_initial_states()
    }
}
