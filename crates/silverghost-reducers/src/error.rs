//! Error types for reductions

use silverghost_actions::ActionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReduceError {
    /// The list reducer received something other than an array, a list
    /// result, or a single-key object wrapping one of those.
    #[error(
        "The payload of {action} must be a list result, an array or an object with a single \
         property where the key is the collect key and the value an array"
    )]
    MalformedPayload { action: String },

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error("Payload conversion failed: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReduceError>;
