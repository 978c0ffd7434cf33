//! Error types for the access log pipeline.
//!
//! Errors are split by the boundary they cross:
//!
//! - [`ConfigError`]: raised while resolving and applying configuration at
//!   startup. Only total exhaustion of the resolution chain reaches the caller.
//! - [`AppendError`] / [`FilterError`]: raised by appenders and filters while an
//!   event is emitted. These never leave [`AccessLogContext::emit`](crate::AccessLogContext::emit).
//! - [`EventError`]: raised by the read-only event adapter when a caller tries
//!   to mutate it.
//!
//! [`AccessLogError`] wraps all of them for callers that want a single type.

use thiserror::Error;

/// Errors raised while resolving or applying configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A URL include/exclude pattern is not a valid regular expression.
    #[error("invalid URL pattern '{pattern}': {source}")]
    InvalidUrlPattern {
        /// The offending pattern as configured
        pattern: String,
        /// Compilation error reported by the regex engine
        #[source]
        source: regex::Error,
    },

    /// No resource exists at the given location.
    #[error("configuration resource not found: {location}")]
    ResourceNotFound {
        /// Location that was looked up
        location: String,
    },

    /// The resource exists but could not be read.
    #[error("failed to read configuration resource '{location}': {source}")]
    Io {
        /// Location that was read
        location: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The resource content is not a valid configuration document.
    #[error("failed to parse configuration resource '{location}': {source}")]
    Parse {
        /// Location that was parsed
        location: String,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but describes something that cannot be built.
    #[error("invalid configuration in '{location}': {message}")]
    Invalid {
        /// Location of the document
        location: String,
        /// Human-readable reason
        message: String,
    },
}

/// Errors raised by an appender while delivering an event.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppendError {
    /// The event could not be serialized for output.
    #[error("failed to serialize access event: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The appender was invoked after it was stopped.
    #[error("appender '{0}' is not started")]
    NotStarted(String),

    /// Appender-specific failure.
    #[error("appender '{name}' failed: {message}")]
    Failed {
        /// Name of the failing appender
        name: String,
        /// Failure description
        message: String,
    },
}

impl AppendError {
    /// Creates an appender-specific failure.
    pub fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Error raised by a filter in the chain while deciding on an event.
#[derive(Debug, Error)]
#[error("filter '{name}' failed: {message}")]
pub struct FilterError {
    /// Name of the failing filter
    pub name: String,
    /// Failure description
    pub message: String,
}

impl FilterError {
    /// Creates a new filter error.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the read-only event adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    /// The operation would mutate an immutable event.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
}

/// Umbrella error for callers that handle every failure the same way.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccessLogError {
    /// Configuration could not be resolved or applied
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An appender failed
    #[error(transparent)]
    Append(#[from] AppendError),
    /// A filter failed
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// An event operation was rejected
    #[error(transparent)]
    Event(#[from] EventError),
}

/// Result type alias for access log operations.
pub type Result<T> = std::result::Result<T, AccessLogError>;
