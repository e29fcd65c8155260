//! Error types for the availability checker
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

use crate::domain::PropertyId;

/// Result type alias for availability-check operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the availability checker
#[derive(Error, Debug)]
pub enum Error {
    /// Scraper failures: backend unreachable, page structure changed, parse
    /// failure. Recoverable; isolated per property.
    #[error("scrape error for {property}: {cause}")]
    Scrape {
        /// Property whose check failed
        property: PropertyId,
        /// Human-readable cause
        cause: String,
    },

    /// Deadline exceeded while checking a property
    #[error("check for {property} timed out after {elapsed_ms}ms")]
    Timeout {
        /// Property whose check was abandoned
        property: PropertyId,
        /// Elapsed time when the deadline fired
        elapsed_ms: u64,
    },

    /// Configuration errors (invalid query, bad settings)
    #[error("configuration error: {0}")]
    Config(String),

    /// A property id that is not registered
    #[error("unknown property: {0}")]
    UnknownProperty(String),

    /// A room filter entry that is not in the property's catalog
    #[error("unknown room {room} for property {property}")]
    UnknownRoom {
        /// Property whose catalog was consulted
        property: PropertyId,
        /// The offending room id
        room: String,
    },

    /// Notification state store errors
    #[error("state store error: {0}")]
    State(String),

    /// Page automation errors (navigation, element lookup, timeouts on the
    /// underlying session). Adapters convert these to `Scrape` at their
    /// boundary.
    #[error("page automation error: {0}")]
    Page(String),

    /// Notifier transport errors
    #[error("notifier error: {0}")]
    Notify(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a scrape error
    pub fn scrape(property: PropertyId, cause: impl Into<String>) -> Self {
        Self::Scrape {
            property,
            cause: cause.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a state store error
    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }

    /// Create a page automation error
    pub fn page(msg: impl Into<String>) -> Self {
        Self::Page(msg.into())
    }

    /// Create a notifier error
    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
