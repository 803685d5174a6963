use thiserror::Error;

/// Result alias used throughout the connector
pub type Result<T> = std::result::Result<T, JbpmError>;

/// Error categories surfaced to the routing framework
#[derive(Error, Debug)]
pub enum JbpmError {
    /// The endpoint URI could not be parsed
    #[error("Invalid endpoint URI: {0}")]
    InvalidUri(String),

    /// The connection URL is malformed or unusable
    #[error("Invalid connection URL '{url}': {reason}")]
    InvalidUrl {
        /// URL as configured
        url:    String,
        /// Why it was refused
        reason: String,
    },

    /// A configuration or header value has the wrong shape
    #[error("Invalid value for parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter or header name
        name:   String,
        /// What was wrong with the value
        reason: String,
    },

    /// An operation argument was neither in the headers nor the configuration
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// The engine lacks a setting the call needs
    #[error("Runtime engine is not configured with {0}")]
    MissingConfiguration(&'static str),

    /// The endpoint cannot provide the requested capability
    #[error("{0}")]
    UnsupportedOperation(String),

    /// The operation name is not recognised
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// A typed payload names a class the engine was not told about
    #[error("Type {0} is not registered as an extra class")]
    UnregisteredClass(String),

    /// Transport level failure talking to the engine
    #[error("Runtime engine communication failed: {0}")]
    Communication(#[from] reqwest::Error),

    /// The engine answered with a non-success status
    #[error("Runtime engine returned HTTP {status}: {message}")]
    RemoteEngine {
        /// HTTP status code
        status:  u16,
        /// Error message reported by the engine
        message: String,
    },

    /// A payload could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl JbpmError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name:   name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_url(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidUrl {
            url:    url.to_string(),
            reason: reason.to_string(),
        }
    }
}
