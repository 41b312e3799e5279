//! # Silverghost Actions
//!
//! Path-template action definitions and routing.
//!
//! ## Features
//!
//! - **Path templates**: static and `:param` segments; concrete paths split on
//!   `/`, `#` and `?`
//! - **Pathgroups**: nested enumerations of legal implicit values, resolved
//!   depth by depth
//! - **Action definitions**: REQUEST/DATA/ERROR kinds with `instance` and
//!   `propagate` factories
//! - **Router**: an explicit registry; first registered definition wins
//! - **Payload tree**: `Arc`-shared JSON nodes with copy-on-write writes
//!
//! ## Example
//!
//! ```
//! use silverghost_actions::{ActionDefinition, ActionInstance, ActionRouter, Location, PathgroupValue};
//!
//! let router = ActionRouter::new().with_definition(
//!     ActionDefinition::new("@@App/WELCOME")
//!         .with_reducer_key("welcome")
//!         .with_pathname("/welcome/:channel/:query")
//!         .with_pathgroup("channel", PathgroupValue::options(["room", "broadcast"])),
//! );
//!
//! let event = ActionInstance::location_change(&Location::parse("/welcome/broadcast"));
//! let request = router.match_event(&event);
//! assert_eq!(request.action_type, "@@App/WELCOME_REQUEST");
//! ```

pub mod definition;
pub mod error;
pub mod instance;
pub mod location;
pub mod payload;
pub mod query;
pub mod router;
pub mod template;

pub use definition::{ActionDefinition, InstanceProperties};
pub use error::{ActionError, Result};
pub use instance::{ActionInstance, ActionKind, FilterCriterion, Pagination, SortDirection, Sorting};
pub use location::{Location, LocationProvider, LOCATION_CHANGE};
pub use payload::Node;
pub use router::{ActionRouter, MatchOutcome};
pub use template::pathgroup::{PathgroupOptions, PathgroupValue, Pathgroups};
pub use template::PathTemplate;
