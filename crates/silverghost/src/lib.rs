//! # Silverghost
//!
//! Client-side state routing: actions described by path templates, reduced
//! into a state tree keyed by the parameters those paths resolve to.
//!
//! This crate bundles [`silverghost_actions`] and [`silverghost_reducers`]
//! with a TOML configuration layer and a synchronous in-memory [`Store`].
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use silverghost::{accumulate, Config, DefaultReducer, InstanceProperties, Location, Store};
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     [[action]]
//!     name = "WELCOME"
//!     reducer_key = "welcome"
//!     pathname = "/welcome/:channel"
//!     [action.pathgroups]
//!     channel = ["room", "broadcast"]
//!     "#,
//! )
//! .unwrap();
//! let router = config.router().unwrap();
//! let welcome = router.get("@@App/WELCOME").unwrap().clone();
//!
//! let mut store = Store::builder(router)
//!     .with_slice("welcome", accumulate(DefaultReducer::new(None, [welcome.clone()])))
//!     .with_service(move |action: &silverghost::ActionInstance, store: &Store| {
//!         let params = store.params(action).ok()?;
//!         (action.action_type == welcome.request_type()).then(|| {
//!             welcome.instance(InstanceProperties::data().params(params).payload(json!("hi")))
//!         })
//!     })
//!     .build();
//!
//! store.navigate(Location::parse("/welcome/broadcast")).unwrap();
//! let state = store.state("welcome").unwrap();
//! assert_eq!(state.payload.to_value(), json!({"broadcast": "hi"}));
//! ```

pub mod config;
pub mod store;

pub use silverghost_actions as actions;
pub use silverghost_reducers as reducers;

pub use config::{ActionConfig, Config, ListConfig};
pub use store::{Service, Store, StoreBuilder};

pub use silverghost_actions::{
    ActionDefinition, ActionError, ActionInstance, ActionKind, ActionRouter, FilterCriterion,
    InstanceProperties, Location, LocationProvider, MatchOutcome, Node, Pagination,
    PathgroupOptions, PathgroupValue, Pathgroups, SortDirection, Sorting, LOCATION_CHANGE,
};
pub use silverghost_reducers::{
    accumulate, chain, collect, split, Accumulate, Chain, Collect, DefaultReducer,
    ErrorLogReducer, ListReducer, ListResult, NextPage, PsfState, ReduceError, Reducer, Split,
};
