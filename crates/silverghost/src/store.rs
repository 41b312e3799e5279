//! In-memory dispatch surface
//!
//! A [`Store`] owns the router, one state slice per registered reducer and
//! the current location. Dispatching routes the action, reduces every slice
//! in registration order, then offers the routed action to each [`Service`].
//! Follow-up actions returned by services are dispatched after it, in order.

use std::collections::VecDeque;

use serde_json::Value;
use silverghost_actions::{ActionInstance, ActionRouter, Location, LocationProvider};
use silverghost_reducers::{Reducer, Result};
use tracing::{debug, warn};

/// Upper bound on follow-ups triggered by a single dispatch
pub const MAX_FOLLOW_UPS: usize = 64;

/// Reacts to dispatched actions, e.g. by fetching the data a REQUEST asks
/// for and answering with the matching DATA action.
pub trait Service {
    fn handle(&self, action: &ActionInstance, store: &Store) -> Option<ActionInstance>;
}

impl<F> Service for F
where
    F: Fn(&ActionInstance, &Store) -> Option<ActionInstance>,
{
    fn handle(&self, action: &ActionInstance, store: &Store) -> Option<ActionInstance> {
        self(action, store)
    }
}

struct Slice {
    key: String,
    reducer: Box<dyn Reducer>,
    state: Option<ActionInstance>,
}

pub struct StoreBuilder {
    router: ActionRouter,
    location: Location,
    slices: Vec<(String, Box<dyn Reducer>)>,
    services: Vec<Box<dyn Service>>,
}

impl StoreBuilder {
    /// Registers the reducer of the state slice `key`.
    ///
    /// Registering the same key again replaces the earlier reducer.
    pub fn with_slice<R: Reducer + 'static>(mut self, key: impl Into<String>, reducer: R) -> Self {
        let key = key.into();
        match self.slices.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => {
                warn!("Replacing reducer of slice {}", key);
                slot.1 = Box::new(reducer);
            }
            None => self.slices.push((key, Box::new(reducer))),
        }
        self
    }

    pub fn with_service<S: Service + 'static>(mut self, service: S) -> Self {
        self.services.push(Box::new(service));
        self
    }

    /// Location the store starts at (default: `/`)
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    pub fn build(self) -> Store {
        let slices = self
            .slices
            .into_iter()
            .map(|(key, reducer)| {
                let state = reducer.initial_state();
                Slice { key, reducer, state }
            })
            .collect();
        Store {
            router: self.router,
            location: self.location,
            slices,
            services: self.services,
        }
    }
}

pub struct Store {
    router: ActionRouter,
    location: Location,
    slices: Vec<Slice>,
    services: Vec<Box<dyn Service>>,
}

impl Store {
    pub fn builder(router: ActionRouter) -> StoreBuilder {
        StoreBuilder {
            router,
            location: Location::new("/"),
            slices: Vec::new(),
            services: Vec::new(),
        }
    }

    pub fn router(&self) -> &ActionRouter {
        &self.router
    }

    /// Current location
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Current state of the slice `key`
    pub fn state(&self, key: &str) -> Option<&ActionInstance> {
        self.slices
            .iter()
            .find(|slice| slice.key == key)
            .and_then(|slice| slice.state.as_ref())
    }

    /// Parameters of `action`, falling back to the current location
    pub fn params(&self, action: &ActionInstance) -> silverghost_actions::Result<Vec<Value>> {
        self.router.params(action, &self.location)
    }

    /// Records `location` and dispatches the navigation event for it
    pub fn navigate(&mut self, location: Location) -> Result<()> {
        self.dispatch(ActionInstance::location_change(&location))
    }

    /// Dispatches `action` and every follow-up the services answer with.
    ///
    /// A reducer error aborts the dispatch; slices reduced before it keep
    /// their new state.
    pub fn dispatch(&mut self, action: ActionInstance) -> Result<()> {
        let mut queue = VecDeque::from([action]);
        let mut follow_ups = 0;

        while let Some(action) = queue.pop_front() {
            let routed = self.router.match_event(&action);
            if action.is_location_change() {
                if let Some(location) = action.location() {
                    self.location = location;
                }
            }
            debug!("Dispatching {}", routed.action_type);

            self.reduce(&routed)?;

            for service in &self.services {
                let Some(next) = service.handle(&routed, self) else {
                    continue;
                };
                if follow_ups == MAX_FOLLOW_UPS {
                    warn!(
                        "Dropping {}: more than {} follow-up actions",
                        next.action_type, MAX_FOLLOW_UPS
                    );
                    continue;
                }
                follow_ups += 1;
                queue.push_back(next);
            }
        }

        Ok(())
    }

    fn reduce(&mut self, action: &ActionInstance) -> Result<()> {
        for slice in &mut self.slices {
            if let Some(state) = slice.reducer.reduce(slice.state.as_ref(), action)? {
                debug!("Slice {} reduced {}", slice.key, action.action_type);
                slice.state = Some(state);
            }
        }
        Ok(())
    }
}

impl LocationProvider for Store {
    fn current_location(&self) -> Location {
        self.location.clone()
    }
}
