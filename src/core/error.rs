//! Authorization error types

use thiserror::Error;

/// Errors that can occur while building policies or resolving permissions
///
/// A denied permission is never an error: it is `Ok(false)`. Errors signal
/// misconfiguration or a predicate that could not be evaluated.
#[derive(Error, Debug)]
pub enum PolicyError {
    /// Permission is neither a policy nor a decomposable compound name
    #[error("Unknown permission: {0}")]
    UnknownPermission(String),

    /// A predicate needed an argument the caller did not supply
    #[error("Missing argument: {argument}")]
    MissingArgument {
        /// Name of the missing argument
        argument: String,
    },

    /// A predicate failed while being evaluated
    #[error("Predicate error: {0}")]
    Predicate(String),

    /// Invalid policy configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PolicyError {
    /// Create a missing argument error
    pub fn missing_argument(argument: impl Into<String>) -> Self {
        PolicyError::MissingArgument {
            argument: argument.into(),
        }
    }

    /// Create a predicate error from a message
    pub fn predicate(msg: impl Into<String>) -> Self {
        PolicyError::Predicate(msg.into())
    }

    /// Create a configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        PolicyError::InvalidConfig(msg.into())
    }

    /// Whether this is a lookup failure rather than an evaluation failure
    pub fn is_unknown_permission(&self) -> bool {
        matches!(self, PolicyError::UnknownPermission(_))
    }
}

/// Result type alias for policy operations
pub type PolicyResult<T> = Result<T, PolicyError>;
