//! Index handle types for search store operations.
//!
//! This module provides the per-index API surface: document CRUD, partial
//! and scripted updates, existence checks, and search execution. It offers
//! both typed handles (full type safety) and dynamic handles (for working
//! with dynamically dispatched backends).
//!
//! # Handle Types
//!
//! - [`IndexHandle`] - Untyped handle with explicit JSON documents
//! - [`TypedIndexHandle`] - Type-safe handle for a specific document type
//! - [`DynIndexHandle`] - Dynamic dispatch version of the untyped handle
//! - [`DynTypedIndexHandle`] - Dynamic dispatch version of the typed handle
//!
//! All payload construction happens here or in the [`query`](crate::query)
//! and [`script`](crate::script) modules; the backend only executes finished
//! bodies.

use serde::Serialize;
use serde_json::{Value, json};
use std::marker::PhantomData;

use crate::{
    backend::{DynSearchBackend, SearchBackend},
    document::{Ack, Document, DocumentExt, GetResponse, SearchResponse},
    error::{SearchResult, SearchStoreError},
    query::SearchQuery,
    script::ArrayMutation,
};

/// Rejects unusable targets before anything goes on the wire.
fn ensure_target(index: &str, id: &str) -> SearchResult<()> {
    if index.is_empty() {
        return Err(SearchStoreError::InvalidRequest("index name is empty".to_string()));
    }
    if id.is_empty() {
        return Err(SearchStoreError::InvalidRequest("document id is empty".to_string()));
    }
    Ok(())
}

fn ensure_index(index: &str) -> SearchResult<()> {
    if index.is_empty() {
        return Err(SearchStoreError::InvalidRequest("index name is empty".to_string()));
    }
    Ok(())
}

/// An empty creation body is stored as `{"id": <id>}` so the document is
/// still addressable.
fn create_body(id: &str, body: Value) -> Value {
    let empty = match &body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty { json!({ "id": id }) } else { body }
}

fn doc_patch(patch: Value) -> Value {
    json!({ "doc": patch })
}

/// An untyped index handle with a reference to a transport backend.
///
/// Documents are plain [`Value`]s, providing maximum flexibility without
/// compile-time type safety.
#[derive(Debug)]
pub struct IndexHandle<'a, B: SearchBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: SearchBackend> IndexHandle<'a, B> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a document under the given id, creating or overwriting it.
    ///
    /// An empty body (`null` or `{}`) is replaced by `{"id": <id>}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the target is invalid or the backend refuses the
    /// operation.
    pub async fn create(&self, id: &str, body: Value) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend
            .index(&self.name, id, create_body(id, body))
            .await
    }

    /// Fetches a document with its metadata.
    pub async fn read(&self, id: &str) -> SearchResult<GetResponse> {
        ensure_target(&self.name, id)?;
        self.backend.get(&self.name, id).await
    }

    /// Fetches only the raw source bytes of a document.
    pub async fn source(&self, id: &str) -> SearchResult<Vec<u8>> {
        ensure_target(&self.name, id)?;
        self.backend.get_source(&self.name, id).await
    }

    /// Merges the given fields into an existing document
    /// (`{"doc": <patch>}` partial update).
    ///
    /// Fields absent from the patch keep their stored values. A patch that
    /// changes nothing is acknowledged with a `noop` result.
    pub async fn update(&self, id: &str, patch: Value) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend
            .update(&self.name, id, doc_patch(patch))
            .await
    }

    /// Checks whether a document exists.
    pub async fn exists(&self, id: &str) -> SearchResult<bool> {
        ensure_target(&self.name, id)?;
        self.backend.exists(&self.name, id).await
    }

    /// Deletes a document by id.
    pub async fn delete(&self, id: &str) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend.delete(&self.name, id).await
    }

    /// Appends an element to an array field of a stored document, creating
    /// the array when the field is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the array name is not a plain identifier, the
    /// item cannot be serialized, or the backend refuses the update.
    pub async fn insert_array_item(
        &self,
        id: &str,
        array: &str,
        item: &impl Serialize,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::append(array, item)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Replaces the first element of an array field whose `selector_field`
    /// equals `selector_value`. When no element matches, the document source
    /// is left unchanged.
    pub async fn update_array_item(
        &self,
        id: &str,
        array: &str,
        selector_field: &str,
        selector_value: i64,
        item: &impl Serialize,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::replace(array, selector_field, selector_value, item)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Removes every element of an array field whose `selector_field`
    /// equals `selector_value`.
    pub async fn remove_array_item(
        &self,
        id: &str,
        array: &str,
        selector_field: &str,
        selector_value: i64,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::remove(array, selector_field, selector_value)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Renders the query and executes it, returning the raw response bytes.
    ///
    /// The hit count is capped at the query's effective size
    /// (defaulted when unset or non-positive).
    pub async fn search(&self, query: &SearchQuery) -> SearchResult<Vec<u8>> {
        ensure_index(&self.name)?;
        let body = query.render()?;
        self.backend
            .search(&self.name, body, query.effective_size())
            .await
    }

    /// Like [`search`](IndexHandle::search), but decodes the response
    /// envelope.
    pub async fn search_response(&self, query: &SearchQuery) -> SearchResult<SearchResponse> {
        let raw = self.search(query).await?;
        SearchResponse::from_bytes(&raw)
    }
}

/// A dynamic (type-erased) index handle over a backend trait object.
///
/// Mirrors [`IndexHandle`] but uses dynamic dispatch, enabling backend
/// selection at runtime without generic type parameters.
#[derive(Debug)]
pub struct DynIndexHandle<'a> {
    name: String,
    backend: &'a dyn DynSearchBackend,
}

impl<'a> DynIndexHandle<'a> {
    pub(crate) fn new(name: String, backend: &'a dyn DynSearchBackend) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stores a document under the given id, creating or overwriting it.
    ///
    /// An empty body (`null` or `{}`) is replaced by `{"id": <id>}`.
    pub async fn create(&self, id: &str, body: Value) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend
            .index(&self.name, id, create_body(id, body))
            .await
    }

    /// Fetches a document with its metadata.
    pub async fn read(&self, id: &str) -> SearchResult<GetResponse> {
        ensure_target(&self.name, id)?;
        self.backend.get(&self.name, id).await
    }

    /// Fetches only the raw source bytes of a document.
    pub async fn source(&self, id: &str) -> SearchResult<Vec<u8>> {
        ensure_target(&self.name, id)?;
        self.backend.get_source(&self.name, id).await
    }

    /// Merges the given fields into an existing document.
    pub async fn update(&self, id: &str, patch: Value) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend
            .update(&self.name, id, doc_patch(patch))
            .await
    }

    /// Checks whether a document exists.
    pub async fn exists(&self, id: &str) -> SearchResult<bool> {
        ensure_target(&self.name, id)?;
        self.backend.exists(&self.name, id).await
    }

    /// Deletes a document by id.
    pub async fn delete(&self, id: &str) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend.delete(&self.name, id).await
    }

    /// Appends an element to an array field of a stored document.
    pub async fn insert_array_item(
        &self,
        id: &str,
        array: &str,
        item: &impl Serialize,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::append(array, item)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Replaces the first matching element of an array field.
    pub async fn update_array_item(
        &self,
        id: &str,
        array: &str,
        selector_field: &str,
        selector_value: i64,
        item: &impl Serialize,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::replace(array, selector_field, selector_value, item)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Removes every matching element of an array field.
    pub async fn remove_array_item(
        &self,
        id: &str,
        array: &str,
        selector_field: &str,
        selector_value: i64,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::remove(array, selector_field, selector_value)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Renders the query and executes it, returning the raw response bytes.
    pub async fn search(&self, query: &SearchQuery) -> SearchResult<Vec<u8>> {
        ensure_index(&self.name)?;
        let body = query.render()?;
        self.backend
            .search(&self.name, body, query.effective_size())
            .await
    }

    /// Like [`search`](DynIndexHandle::search), but decodes the response
    /// envelope.
    pub async fn search_response(&self, query: &SearchQuery) -> SearchResult<SearchResponse> {
        let raw = self.search(query).await?;
        SearchResponse::from_bytes(&raw)
    }
}

/// A type-safe index handle for a specific document type.
#[derive(Debug)]
pub struct TypedIndexHandle<'a, B: SearchBackend, D: Document> {
    name: String,
    backend: &'a B,
    _marker: PhantomData<D>,
}

impl<'a, B: SearchBackend, D: Document> TypedIndexHandle<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts this typed handle to a different document type over the same
    /// index.
    pub fn with_type<T: Document>(&self) -> TypedIndexHandle<'a, B, T> {
        TypedIndexHandle {
            name: self.name.clone(),
            backend: self.backend,
            _marker: PhantomData,
        }
    }

    /// Stores a document under its own id, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the backend refuses the
    /// operation.
    pub async fn create(&self, document: &D) -> SearchResult<Ack> {
        let id = document.id();
        ensure_target(&self.name, &id)?;
        self.backend
            .index(&self.name, &id, document.to_json()?)
            .await
    }

    /// Fetches a document and deserializes its source.
    pub async fn read(&self, id: &str) -> SearchResult<D> {
        ensure_target(&self.name, id)?;
        let response = self.backend.get(&self.name, id).await?;
        response.source_as()
    }

    /// Fetches only the raw source bytes of a document.
    pub async fn source(&self, id: &str) -> SearchResult<Vec<u8>> {
        ensure_target(&self.name, id)?;
        self.backend.get_source(&self.name, id).await
    }

    /// Merges the given fields into an existing document.
    pub async fn update(&self, id: &str, patch: Value) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend
            .update(&self.name, id, doc_patch(patch))
            .await
    }

    /// Checks whether a document exists.
    pub async fn exists(&self, id: &str) -> SearchResult<bool> {
        ensure_target(&self.name, id)?;
        self.backend.exists(&self.name, id).await
    }

    /// Deletes a document by id.
    pub async fn delete(&self, id: &str) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend.delete(&self.name, id).await
    }

    /// Appends an element to an array field of a stored document.
    pub async fn insert_array_item(
        &self,
        id: &str,
        array: &str,
        item: &impl Serialize,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::append(array, item)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Replaces the first matching element of an array field.
    pub async fn update_array_item(
        &self,
        id: &str,
        array: &str,
        selector_field: &str,
        selector_value: i64,
        item: &impl Serialize,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::replace(array, selector_field, selector_value, item)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Removes every matching element of an array field.
    pub async fn remove_array_item(
        &self,
        id: &str,
        array: &str,
        selector_field: &str,
        selector_value: i64,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::remove(array, selector_field, selector_value)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Renders the query, executes it, and deserializes every hit source.
    pub async fn search(&self, query: &SearchQuery) -> SearchResult<Vec<D>> {
        ensure_index(&self.name)?;
        let body = query.render()?;
        let raw = self
            .backend
            .search(&self.name, body, query.effective_size())
            .await?;
        SearchResponse::from_bytes(&raw)?.documents()
    }
}

/// A dynamic dispatch version of [`TypedIndexHandle`].
#[derive(Debug)]
pub struct DynTypedIndexHandle<'a, D: Document> {
    name: String,
    backend: &'a dyn DynSearchBackend,
    _marker: PhantomData<D>,
}

impl<'a, D: Document> DynTypedIndexHandle<'a, D> {
    pub(crate) fn new(name: String, backend: &'a dyn DynSearchBackend) -> Self {
        Self { name, backend, _marker: PhantomData }
    }

    /// Returns the name of this index.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Converts this typed handle to a different document type over the same
    /// index.
    pub fn with_type<T: Document>(&self) -> DynTypedIndexHandle<'a, T> {
        DynTypedIndexHandle {
            name: self.name.clone(),
            backend: self.backend,
            _marker: PhantomData,
        }
    }

    /// Stores a document under its own id, creating or overwriting it.
    pub async fn create(&self, document: &D) -> SearchResult<Ack> {
        let id = document.id();
        ensure_target(&self.name, &id)?;
        self.backend
            .index(&self.name, &id, document.to_json()?)
            .await
    }

    /// Fetches a document and deserializes its source.
    pub async fn read(&self, id: &str) -> SearchResult<D> {
        ensure_target(&self.name, id)?;
        let response = self.backend.get(&self.name, id).await?;
        response.source_as()
    }

    /// Fetches only the raw source bytes of a document.
    pub async fn source(&self, id: &str) -> SearchResult<Vec<u8>> {
        ensure_target(&self.name, id)?;
        self.backend.get_source(&self.name, id).await
    }

    /// Merges the given fields into an existing document.
    pub async fn update(&self, id: &str, patch: Value) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend
            .update(&self.name, id, doc_patch(patch))
            .await
    }

    /// Checks whether a document exists.
    pub async fn exists(&self, id: &str) -> SearchResult<bool> {
        ensure_target(&self.name, id)?;
        self.backend.exists(&self.name, id).await
    }

    /// Deletes a document by id.
    pub async fn delete(&self, id: &str) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        self.backend.delete(&self.name, id).await
    }

    /// Appends an element to an array field of a stored document.
    pub async fn insert_array_item(
        &self,
        id: &str,
        array: &str,
        item: &impl Serialize,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::append(array, item)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Replaces the first matching element of an array field.
    pub async fn update_array_item(
        &self,
        id: &str,
        array: &str,
        selector_field: &str,
        selector_value: i64,
        item: &impl Serialize,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::replace(array, selector_field, selector_value, item)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Removes every matching element of an array field.
    pub async fn remove_array_item(
        &self,
        id: &str,
        array: &str,
        selector_field: &str,
        selector_value: i64,
    ) -> SearchResult<Ack> {
        ensure_target(&self.name, id)?;
        let body = ArrayMutation::remove(array, selector_field, selector_value)?.render();
        self.backend.update(&self.name, id, body).await
    }

    /// Renders the query, executes it, and deserializes every hit source.
    pub async fn search(&self, query: &SearchQuery) -> SearchResult<Vec<D>> {
        ensure_index(&self.name)?;
        let body = query.render()?;
        let raw = self
            .backend
            .search(&self.name, body, query.effective_size())
            .await?;
        SearchResponse::from_bytes(&raw)?.documents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_create_body_defaults_to_id_document() {
        assert_eq!(create_body("a-1", json!(null)), json!({ "id": "a-1" }));
        assert_eq!(create_body("a-1", json!({})), json!({ "id": "a-1" }));
        assert_eq!(
            create_body("a-1", json!({ "text": "x" })),
            json!({ "text": "x" })
        );
    }

    #[test]
    fn patches_are_wrapped_in_doc() {
        assert_eq!(
            doc_patch(json!({ "text": "new" })),
            json!({ "doc": { "text": "new" } })
        );
    }

    #[test]
    fn blank_targets_are_rejected() {
        assert!(matches!(
            ensure_target("", "a-1"),
            Err(SearchStoreError::InvalidRequest(_))
        ));
        assert!(matches!(
            ensure_target("articles", ""),
            Err(SearchStoreError::InvalidRequest(_))
        ));
        assert!(ensure_target("articles", "a-1").is_ok());
    }
}
