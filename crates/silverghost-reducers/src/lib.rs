//! # Silverghost Reducers
//!
//! Reducer composition over a parameter-keyed state tree.
//!
//! ## Features
//!
//! - **Leaf reducers**: [`DefaultReducer`] takes matching DATA actions as state,
//!   [`ErrorLogReducer`] logs `*_ERROR` actions
//! - **[`chain`]**: first reducer that reduces wins
//! - **[`split`]**: one reducer per slot of a list payload
//! - **[`accumulate`]**: replaces the tree branch addressed by the action's params
//! - **[`collect`]**: deep-merges into the addressed branch, keeping untouched keys
//! - **[`ListReducer`]**: page cache invalidated by page size, sorting and filter
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use silverghost_actions::{ActionDefinition, InstanceProperties, PathgroupValue};
//! use silverghost_reducers::{accumulate, DefaultReducer, Reducer};
//!
//! let welcome = Arc::new(
//!     ActionDefinition::new("@@App/WELCOME")
//!         .with_pathname("/welcome/:channel")
//!         .with_pathgroup("channel", PathgroupValue::options(["room", "broadcast"])),
//! );
//! let reducer = accumulate(DefaultReducer::new(None, [Arc::clone(&welcome)]));
//!
//! let room = welcome.instance(InstanceProperties::data().params(vec![json!("room")]).payload(json!(1)));
//! let state = reducer.reduce(None, &room).unwrap().unwrap();
//!
//! let broadcast = welcome.instance(InstanceProperties::data().params(vec![json!("broadcast")]).payload(json!(2)));
//! let state = reducer.reduce(Some(&state), &broadcast).unwrap().unwrap();
//!
//! assert_eq!(state.payload.to_value(), json!({"room": 1, "broadcast": 2}));
//! ```

pub mod accumulate;
pub mod collect;
pub mod combinators;
pub mod default;
pub mod error;
pub mod graph;
pub mod list;
pub mod pathgroup;
pub mod reducer;

pub use accumulate::{accumulate, Accumulate};
pub use collect::{collect, Collect};
pub use combinators::{chain, split, Chain, Split};
pub use default::{DefaultReducer, ErrorLogReducer};
pub use error::{ReduceError, Result};
pub use list::{ListReducer, ListResult, NextPage, PsfState};
pub use reducer::{from_fn, FnReducer, Reducer};
