//! Error types for the Typeroute core library
//!
//! Planning misses are deliberately not errors: an absent route is an
//! expected, recoverable outcome and is represented as `None` by the planner.
//! Errors here cover the execution side (a transformer that cannot produce a
//! value) and the ambient concerns of concrete transformers (I/O, JSON,
//! configuration).

use crate::types::{AnyValue, TypeTag};
use thiserror::Error;

/// Main error type for Typeroute operations
#[derive(Error, Debug)]
pub enum Error {
    /// A transformer along a route could not produce a value. Carries the
    /// offending input value and the step's target type for diagnostics.
    #[error("Transformation to {target} failed: {message}")]
    Transformation {
        message: String,
        target: TypeTag,
        value: Option<AnyValue>,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// A transformer was handed a value of the wrong runtime type
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: TypeTag, actual: TypeTag },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// IO errors from concrete transformers
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing and serialization errors from concrete transformers
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    /// Convenience constructor for a transformation failure without a cause.
    pub fn transformation(message: impl Into<String>, target: TypeTag) -> Self {
        Error::Transformation {
            message: message.into(),
            target,
            value: None,
            source: None,
        }
    }
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
