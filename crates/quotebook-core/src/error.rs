//! Error types surfaced to callers of the core
//!
//! Every variant is recoverable: the running session keeps going and the
//! quote collection is left in its last good state.

use thiserror::Error;

use crate::remote::RemoteError;
use crate::storage::StorageError;

/// Errors returned by quote store and sync operations
#[derive(Error, Debug)]
pub enum QuoteError {
    /// Persistent store is inaccessible
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// Import data is not an array of well-formed quotes
    #[error("Malformed import: {details}")]
    MalformedImport { details: String },

    /// Remote source could not be reached
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Remote source answered with an error or an unusable body
    #[error("Server error: {0}")]
    ServerError(String),

    /// User input rejected before any mutation
    #[error("Invalid {field}: {reason}")]
    ValidationFailed { field: &'static str, reason: String },
}

impl QuoteError {
    /// Create a malformed import error
    pub fn malformed(details: impl Into<String>) -> Self {
        QuoteError::MalformedImport {
            details: details.into(),
        }
    }
}

impl From<RemoteError> for QuoteError {
    fn from(error: RemoteError) -> Self {
        match error {
            RemoteError::Network(_) => QuoteError::NetworkUnavailable(error.to_string()),
            RemoteError::Server { .. } | RemoteError::Parse(_) => {
                QuoteError::ServerError(error.to_string())
            }
        }
    }
}
