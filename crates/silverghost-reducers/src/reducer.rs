//! The reducer contract
//!
//! A reducer looks at the previous state of its slice and an action. It
//! either produces the next state (`Ok(Some(..))`) or declines to reduce
//! (`Ok(None)`), in which case the previous state stays in place.

use std::sync::Arc;

use silverghost_actions::ActionInstance;

use crate::error::Result;

pub trait Reducer {
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>>;

    /// State of the slice before any action was reduced
    fn initial_state(&self) -> Option<ActionInstance> {
        None
    }
}

impl<R: Reducer + ?Sized> Reducer for Box<R> {
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        (**self).reduce(state, action)
    }

    fn initial_state(&self) -> Option<ActionInstance> {
        (**self).initial_state()
    }
}

impl<R: Reducer + ?Sized> Reducer for Arc<R> {
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        (**self).reduce(state, action)
    }

    fn initial_state(&self) -> Option<ActionInstance> {
        (**self).initial_state()
    }
}

/// Reducer backed by a closure
pub struct FnReducer<F> {
    reduce: F,
}

/// Wraps a closure as a [`Reducer`] without initial state
///
/// ```
/// use silverghost_actions::ActionInstance;
/// use silverghost_reducers::{from_fn, Reducer};
///
/// let passthrough = from_fn(|_state, action: &ActionInstance| Ok(Some(action.clone())));
/// let action = ActionInstance::new("@@App/PING_DATA");
/// assert_eq!(passthrough.reduce(None, &action).unwrap(), Some(action));
/// ```
pub fn from_fn<F>(reduce: F) -> FnReducer<F>
where
    F: Fn(Option<&ActionInstance>, &ActionInstance) -> Result<Option<ActionInstance>>,
{
    FnReducer { reduce }
}

impl<F> Reducer for FnReducer<F>
where
    F: Fn(Option<&ActionInstance>, &ActionInstance) -> Result<Option<ActionInstance>>,
{
    fn reduce(
        &self,
        state: Option<&ActionInstance>,
        action: &ActionInstance,
    ) -> Result<Option<ActionInstance>> {
        (self.reduce)(state, action)
    }
}
