//! Non-destructive collection into the state tree

use silverghost_actions::{ActionInstance, Node};

use crate::accumulate::definition_of;
use crate::error::Result;
use crate::pathgroup::{address, is_same_pathgroup};
use crate::reducer::Reducer;

/// Deep-merges each reduction into the previous state.
///
/// The previous payload and the reduction payload are aligned by walking
/// the action's tree address while both contain the next key. At that
/// depth, two maps are merged key by key: keys only present in the
/// previous state survive, nested maps merge recursively and every other
/// value is taken from the reduction. A reduction that does not continue
/// the previous one is kept as it is.
pub struct Collect<R> {
    inner: R,
}

pub fn collect<R: Reducer>(inner: R) -> Collect<R> {
    Collect { inner }
}

impl<R: Reducer> Collect<R> {
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Reducer> Reducer for Collect<R> {
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        let Some(mut reduction) = self.inner.reduce(state, action)? else {
            return Ok(None);
        };
        let (Some(state), Some(definition)) = (state, definition_of(&reduction, Some(action)))
        else {
            return Ok(Some(reduction));
        };

        let address = address(&definition, action.params_or_empty())?;
        if !is_same_pathgroup(&address.pathgroup_params, Some(state), &reduction) {
            return Ok(Some(reduction));
        }

        let merged = {
            let mut previous = &state.payload;
            let mut next = &reduction.payload;
            let mut depth = 0;
            for key in &address.path {
                match (previous.get(key), next.get(key)) {
                    (Some(p), Some(n)) => {
                        previous = p;
                        next = n;
                        depth += 1;
                    }
                    _ => break,
                }
            }
            (previous.is_map() && next.is_map())
                .then(|| (depth, Node::deep_merge(previous, next)))
        };

        if let Some((depth, merged)) = merged {
            reduction.payload.set_in(&address.path[..depth], merged);
        }
        Ok(Some(reduction))
    }

    fn initial_state(&self) -> Option<ActionInstance> {
        self.inner.initial_state()
    }
}
