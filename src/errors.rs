//! Unified error types for the admin console.
//!
//! Every remote call site converts transport failures into one of the recoverable
//! kinds (`Fetch`, `Write`, `Delete`, `Validation`), so callers only ever match on
//! this enum.

use thiserror::Error;

/// Errors surfaced by the admin console library.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a collection from the backend failed
    #[error("Failed to fetch {resource}: {message}")]
    Fetch {
        /// Backend collection that was being read
        resource: String,
        /// Human-readable failure description
        message: String,
    },

    /// Creating, updating or uploading failed
    #[error("{message}")]
    Write {
        /// Server message when one was returned, otherwise a generic description
        message: String,
    },

    /// Removing a record failed
    #[error("{message}")]
    Delete {
        /// Human-readable failure description
        message: String,
    },

    /// Local input validation failed; no network call was made
    #[error("Invalid {field}: {reason}")]
    Validation {
        /// Name of the offending input field
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// No active admin session, or a login attempt was refused
    #[error("Not authorized: {reason}")]
    Unauthorized {
        /// Why access was refused
        reason: String,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Local file I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Local JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand for building a [`Error::Validation`].
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
