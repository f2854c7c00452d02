//! Transport backend abstraction for the search store.
//!
//! This module defines the traits that abstract over concrete document store
//! transports, allowing the same store API to execute against a live cluster
//! or an in-process test double.
//!
//! # Overview
//!
//! The [`SearchBackend`] trait carries the full operation surface the store
//! needs: document indexing, partial and scripted updates, deletion, reads,
//! existence checks, and search execution. Implementations are required to be
//! thread-safe (`Send + Sync`) and support concurrent access.
//!
//! # Traits
//!
//! - [`SearchBackend`]: The core trait for transport backends
//! - [`DynSearchBackend`]: A trait for dynamic dispatch over backend implementations
//! - [`SearchBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use searchlayer::backend::SearchBackend;
//! use serde_json::json;
//!
//! let backend = MyBackendImpl::new();
//!
//! let ack = backend
//!     .index("articles", "a-17", json!({ "id": "a-17", "text": "hello" }))
//!     .await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use serde_json::Value;
use std::{any::Any, fmt::Debug};

use crate::{
    document::{Ack, GetResponse},
    error::SearchResult,
};

/// Abstract interface for document store transports.
///
/// Implementers execute finished request bodies against a concrete store.
/// All payload construction happens above this trait; a backend never
/// inspects or rewrites a body beyond what its wire protocol requires.
///
/// # Thread Safety
///
/// All implementations must be thread-safe and support concurrent access from
/// multiple async tasks.
///
/// # Error Handling
///
/// Operations return [`SearchResult<T>`](crate::error::SearchResult).
/// Transport failures surface as
/// [`Transport`](crate::error::SearchStoreError::Transport), error statuses
/// as [`Backend`](crate::error::SearchStoreError::Backend) carrying the raw
/// response body, and undecodable success payloads as
/// [`MalformedResponse`](crate::error::SearchStoreError::MalformedResponse).
/// Backends never retry.
#[async_trait]
pub trait SearchBackend: Send + Sync + Debug {
    /// Stores a document body under the given id, creating or overwriting it.
    ///
    /// # Arguments
    ///
    /// * `index` - The index to store into
    /// * `id` - The document id
    /// * `body` - The full document source
    ///
    /// # Returns
    ///
    /// Returns the backend [`Ack`] (`created` or `updated`).
    async fn index(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack>;

    /// Executes an update body against an existing document.
    ///
    /// The body is either a `{"doc": ...}` merge patch or a
    /// `{"script": ...}` payload produced by
    /// [`ArrayMutation`](crate::script::ArrayMutation). Updating a missing
    /// document is a backend error.
    async fn update(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack>;

    /// Deletes a document by id. Deleting a missing document is a backend
    /// error.
    async fn delete(&self, index: &str, id: &str) -> SearchResult<Ack>;

    /// Fetches a document with its metadata (index, id, version, source).
    async fn get(&self, index: &str, id: &str) -> SearchResult<GetResponse>;

    /// Fetches only the raw source bytes of a document, without metadata.
    async fn get_source(&self, index: &str, id: &str) -> SearchResult<Vec<u8>>;

    /// Checks whether a document exists.
    ///
    /// A success status maps to `true` and a not-found status to `false`;
    /// any other answer is a backend error.
    async fn exists(&self, index: &str, id: &str) -> SearchResult<bool>;

    /// Executes a search body and returns the raw response bytes.
    ///
    /// # Arguments
    ///
    /// * `index` - The index to search
    /// * `body` - A rendered query body
    /// * `size` - Maximum number of hits, already normalized by the caller
    async fn search(&self, index: &str, body: Value, size: i64) -> SearchResult<Vec<u8>>;
}

#[async_trait]
impl<B> SearchBackend for &B
where
    B: SearchBackend,
{
    async fn index(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        (*self).index(index, id, body).await
    }

    async fn update(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        (*self).update(index, id, body).await
    }

    async fn delete(&self, index: &str, id: &str) -> SearchResult<Ack> {
        (*self).delete(index, id).await
    }

    async fn get(&self, index: &str, id: &str) -> SearchResult<GetResponse> {
        (*self).get(index, id).await
    }

    async fn get_source(&self, index: &str, id: &str) -> SearchResult<Vec<u8>> {
        (*self).get_source(index, id).await
    }

    async fn exists(&self, index: &str, id: &str) -> SearchResult<bool> {
        (*self).exists(index, id).await
    }

    async fn search(&self, index: &str, body: Value, size: i64) -> SearchResult<Vec<u8>> {
        (*self).search(index, body, size).await
    }
}

#[async_trait]
impl<B> SearchBackend for &mut B
where
    B: SearchBackend,
{
    async fn index(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        (**self).index(index, id, body).await
    }

    async fn update(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        (**self).update(index, id, body).await
    }

    async fn delete(&self, index: &str, id: &str) -> SearchResult<Ack> {
        (**self).delete(index, id).await
    }

    async fn get(&self, index: &str, id: &str) -> SearchResult<GetResponse> {
        (**self).get(index, id).await
    }

    async fn get_source(&self, index: &str, id: &str) -> SearchResult<Vec<u8>> {
        (**self).get_source(index, id).await
    }

    async fn exists(&self, index: &str, id: &str) -> SearchResult<bool> {
        (**self).exists(index, id).await
    }

    async fn search(&self, index: &str, body: Value, size: i64) -> SearchResult<Vec<u8>> {
        (**self).search(index, body, size).await
    }
}

/// Object-safe mirror of [`SearchBackend`] for dynamic dispatch.
///
/// Automatically implemented for every `SearchBackend`; use it when the
/// concrete backend type is chosen at runtime.
#[async_trait]
pub trait DynSearchBackend: Send + Sync + Debug {
    async fn index(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack>;
    async fn update(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack>;
    async fn delete(&self, index: &str, id: &str) -> SearchResult<Ack>;
    async fn get(&self, index: &str, id: &str) -> SearchResult<GetResponse>;
    async fn get_source(&self, index: &str, id: &str) -> SearchResult<Vec<u8>>;
    async fn exists(&self, index: &str, id: &str) -> SearchResult<bool>;
    async fn search(&self, index: &str, body: Value, size: i64) -> SearchResult<Vec<u8>>;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

#[async_trait]
impl<B: SearchBackend + Send + Sync + 'static> DynSearchBackend for B {
    async fn index(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        SearchBackend::index(self, index, id, body).await
    }

    async fn update(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        SearchBackend::update(self, index, id, body).await
    }

    async fn delete(&self, index: &str, id: &str) -> SearchResult<Ack> {
        SearchBackend::delete(self, index, id).await
    }

    async fn get(&self, index: &str, id: &str) -> SearchResult<GetResponse> {
        SearchBackend::get(self, index, id).await
    }

    async fn get_source(&self, index: &str, id: &str) -> SearchResult<Vec<u8>> {
        SearchBackend::get_source(self, index, id).await
    }

    async fn exists(&self, index: &str, id: &str) -> SearchResult<bool> {
        SearchBackend::exists(self, index, id).await
    }

    async fn search(&self, index: &str, body: Value, size: i64) -> SearchResult<Vec<u8>> {
        SearchBackend::search(self, index, body, size).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Factory trait for constructing backend instances from their configuration.
#[async_trait]
pub trait SearchBackendBuilder {
    type Backend: SearchBackend;

    async fn build(self) -> SearchResult<Self::Backend>;
}
