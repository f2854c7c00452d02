//! Core traits and wire types for document representation.
//!
//! This module provides the trait stored documents implement, the structured
//! acknowledgments mutating operations return, and the search response
//! envelope used when decoding hits.

use serde::{Deserialize, Serialize};
use serde_json::{Value, from_value, to_value};

use crate::error::SearchResult;

/// Core trait that all typed documents stored in a search store must implement.
///
/// Every document carries a string identifier (the backend's native id type)
/// and names the index it belongs to.
///
/// # Example
///
/// ```ignore
/// use searchlayer::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Article {
///     pub id: String,
///     pub text: String,
/// }
///
/// impl Document for Article {
///     fn id(&self) -> String {
///         self.id.clone()
///     }
///
///     fn index_name() -> &'static str {
///         "articles"
///     }
/// }
/// ```
pub trait Document: Serialize + for<'de> Deserialize<'de> + Send + Sync + Clone + 'static {
    /// Returns this document's identifier.
    fn id(&self) -> String;

    /// Returns the name of the index this document belongs to.
    ///
    /// This should be a static, lowercase identifier (e.g., "articles", "users").
    fn index_name() -> &'static str;
}

/// Extension trait providing JSON conversion utilities for documents.
///
/// This trait is automatically implemented for all types that implement [`Document`].
pub trait DocumentExt: Document {
    /// Converts this document to a JSON value for transport.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn to_json(&self) -> SearchResult<Value>;

    /// Creates a document from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure is invalid.
    fn from_json(value: Value) -> SearchResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_json(&self) -> SearchResult<Value> {
        Ok(to_value(self)?)
    }

    fn from_json(value: Value) -> SearchResult<Self> {
        Ok(from_value(value)?)
    }
}

/// Outcome reported by the backend for a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpResult {
    /// The document did not exist and was created.
    Created,
    /// An existing document was overwritten or patched.
    Updated,
    /// The document was removed.
    Deleted,
    /// The operation matched a document but changed nothing.
    Noop,
    /// The operation addressed a document that does not exist.
    NotFound,
}

impl OpResult {
    /// The backend's wire spelling of this result.
    pub fn as_str(&self) -> &'static str {
        match self {
            OpResult::Created => "created",
            OpResult::Updated => "updated",
            OpResult::Deleted => "deleted",
            OpResult::Noop => "noop",
            OpResult::NotFound => "not_found",
        }
    }
}

/// Structured acknowledgment returned by every mutating operation
/// (index, update, scripted update, delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Index the operation ran against.
    #[serde(rename = "_index")]
    pub index: String,
    /// Id of the affected document.
    #[serde(rename = "_id")]
    pub id: String,
    /// Document version after the operation.
    #[serde(rename = "_version")]
    pub version: i64,
    /// What the backend actually did.
    pub result: OpResult,
}

/// Structured read result carrying the stored document source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: i64,
    /// The document source as an untyped JSON value.
    #[serde(rename = "_source")]
    pub source: Value,
}

impl GetResponse {
    /// Deserializes the source into a typed document.
    ///
    /// # Errors
    ///
    /// Returns an error if the source does not match the target type.
    pub fn source_as<D: Document>(&self) -> SearchResult<D> {
        D::from_json(self.source.clone())
    }
}

/// Total-hit count inside a search response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalHits {
    pub value: i64,
}

/// A single search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_source")]
    pub source: Value,
}

/// The hits section of a search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHits {
    pub total: TotalHits,
    pub hits: Vec<SearchHit>,
}

/// Envelope of a search response, as returned by the backend.
///
/// Fields the store does not interpret (shard counts, aggregations) are
/// intentionally absent; decoding ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub took: i64,
    pub hits: SearchHits,
}

impl SearchResponse {
    /// Decodes a raw search response body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchStoreError::MalformedResponse`](crate::error::SearchStoreError::MalformedResponse)
    /// if the bytes are not a valid response envelope.
    pub fn from_bytes(bytes: &[u8]) -> SearchResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| crate::error::SearchStoreError::MalformedResponse(e.to_string()))
    }

    /// Deserializes every hit source into a typed document.
    ///
    /// # Errors
    ///
    /// Returns an error if any hit source does not match the target type.
    pub fn documents<D: Document>(&self) -> SearchResult<Vec<D>> {
        self.hits
            .hits
            .iter()
            .map(|hit| D::from_json(hit.source.clone()))
            .collect()
    }
}
