//! Error types and result types for search store operations.
//!
//! This module provides error handling for all search store operations.
//! Use [`SearchResult<T>`] as the return type for fallible operations.

use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a search store.
///
/// Construction errors ([`InvalidQuery`](SearchStoreError::InvalidQuery),
/// [`InvalidScript`](SearchStoreError::InvalidScript),
/// [`InvalidRequest`](SearchStoreError::InvalidRequest)) are raised before any
/// network call is attempted. Transport and backend errors are surfaced as-is,
/// never retried here; retry policy belongs to the transport layer.
#[derive(Error, Debug)]
pub enum SearchStoreError {
    /// Serialization/deserialization error when converting documents or payloads to JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// The request never reached the backend (connection refused, timeout, DNS).
    #[error("Transport error: {0}")]
    Transport(String),
    /// The backend answered with an error status. Carries the raw response body
    /// for diagnosis.
    #[error("Backend error (status {status}): {body}")]
    Backend { status: u16, body: String },
    /// The backend answered with a success status but the payload could not be
    /// decoded into the expected shape. Distinct from [`Serialization`](SearchStoreError::Serialization):
    /// this indicates a backend contract violation, not a caller mistake.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    /// The query specification cannot be rendered (e.g. an enabled membership
    /// filter with an empty id set).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
    /// The array mutation cannot be rendered (e.g. a field name that is not a
    /// plain identifier).
    #[error("Invalid script: {0}")]
    InvalidScript(String),
    /// A store operation was called with unusable arguments (e.g. an empty
    /// index name or document id).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// A specialized `Result` type for search store operations.
///
/// This type alias is used throughout the crate to indicate operations that may fail
/// with a [`SearchStoreError`].
pub type SearchResult<T> = Result<T, SearchStoreError>;

impl From<SerdeJsonError> for SearchStoreError {
    fn from(err: SerdeJsonError) -> Self {
        SearchStoreError::Serialization(err.to_string())
    }
}
