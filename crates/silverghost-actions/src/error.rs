//! Error types for action definitions and routing

use thiserror::Error;

/// Errors raised while resolving paths against action definitions
#[derive(Debug, Error)]
pub enum ActionError {
    /// A concrete path value is not one of the legal pathgroup options at its depth.
    ///
    /// Recoverable: a router scan skips the definition and tries the next one.
    #[error("Path group parameter {value} not defined for {action}")]
    PathgroupMismatch {
        action: String,
        key: String,
        value: String,
    },

    /// A pathgroup declaration is not array-shaped where nesting is expected.
    #[error("Invalid path group definition on key \"{key}\" of {action}: {reason}")]
    InvalidPathgroup {
        action: String,
        key: String,
        reason: String,
    },

    /// The definition has no path template but the operation needs one.
    #[error("Action {0} has no pathname")]
    MissingPathname(String),

    #[error("Payload conversion failed: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ActionError {
    /// Stable code identifying the error class
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::PathgroupMismatch { .. } => "PGP_MISMATCH",
            ActionError::InvalidPathgroup { .. } => "PGP_INVALID_DEF",
            ActionError::MissingPathname(_) => "MISSING_PATHNAME",
            ActionError::Payload(_) => "PAYLOAD",
        }
    }

    /// Whether the caller may continue by trying another definition
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ActionError::PathgroupMismatch { .. })
    }
}

pub type Result<T> = std::result::Result<T, ActionError>;
