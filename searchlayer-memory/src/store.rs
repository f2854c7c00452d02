//! In-memory search backend implementation.
//!
//! This module provides a simple but faithful in-memory backend that stores
//! document sources as JSON values in HashMaps with async-safe read-write
//! locks, and replays the payload shapes the client layer produces.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mea::rwlock::RwLock;
use serde_json::{Value, json};

use searchlayer_core::{
    backend::{SearchBackend, SearchBackendBuilder},
    document::{Ack, GetResponse, OpResult},
    error::{SearchResult, SearchStoreError},
};

use crate::{evaluator::DocumentEvaluator, script};

#[derive(Debug, Clone)]
struct StoredDocument {
    source: Value,
    version: i64,
}

type IndexMap = HashMap<String, StoredDocument>;
type StoreMap = HashMap<String, IndexMap>;

/// Thread-safe in-memory search backend.
///
/// This struct implements the [`SearchBackend`] trait to provide a fully
/// functional search store that operates entirely in memory using
/// async-aware read-write locks. Document sources are stored as JSON values
/// indexed by id, with a version counter that follows cluster semantics:
/// created documents start at version 1 and every write increments it.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state,
/// allowing it to be safely shared across async tasks. Multiple clones of
/// the same instance share the same underlying data.
///
/// # Fidelity
///
/// Partial updates merge recursively and report `noop` when nothing
/// changes. Scripted array mutations are recognized from their source text
/// and replayed. Searches evaluate the rendered boolean filter body with a
/// full scan and return a cluster-shaped response; hits are ordered by id
/// so results are reproducible.
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// The main storage map: index_name -> (document_id -> document)
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory search backend.
    ///
    /// The returned store is ready for use and contains no indices or
    /// documents.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore` with custom
    /// options.
    ///
    /// Currently, the builder simply creates a default store, but it can be
    /// extended in future versions to support configuration options.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

fn ack(index: &str, id: &str, version: i64, result: OpResult) -> Ack {
    Ack {
        index: index.to_string(),
        id: id.to_string(),
        version,
        result,
    }
}

/// 404 body for reads, shaped like a cluster's get response.
fn not_found(index: &str, id: &str) -> SearchStoreError {
    SearchStoreError::Backend {
        status: 404,
        body: json!({ "_index": index, "_id": id, "found": false }).to_string(),
    }
}

/// 404 body for updates, shaped like a cluster's document_missing_exception.
fn document_missing(index: &str, id: &str) -> SearchStoreError {
    SearchStoreError::Backend {
        status: 404,
        body: json!({
            "error": {
                "type": "document_missing_exception",
                "reason": format!("[{id}]: document missing"),
            },
            "status": 404,
        })
        .to_string(),
    }
}

fn bad_request(kind: &str, reason: &str) -> SearchStoreError {
    SearchStoreError::Backend {
        status: 400,
        body: json!({
            "error": { "type": kind, "reason": reason },
            "status": 400,
        })
        .to_string(),
    }
}

/// Merges patch fields into a target value the way a partial update does:
/// objects merge recursively, everything else is replaced.
fn merge(target: &mut Value, patch: &Value) {
    match (target, patch) {
        (Value::Object(target_fields), Value::Object(patch_fields)) => {
            for (key, patch_value) in patch_fields {
                match target_fields.get_mut(key) {
                    Some(target_value) => merge(target_value, patch_value),
                    None => {
                        target_fields.insert(key.clone(), patch_value.clone());
                    }
                }
            }
        }
        (target, patch) => *target = patch.clone(),
    }
}

#[async_trait]
impl SearchBackend for InMemoryStore {
    async fn index(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        let mut store = self.store.write().await;
        let index_map = store.entry(index.to_string()).or_default();

        match index_map.get_mut(id) {
            Some(existing) => {
                existing.source = body;
                existing.version += 1;
                Ok(ack(index, id, existing.version, OpResult::Updated))
            }
            None => {
                index_map.insert(id.to_string(), StoredDocument { source: body, version: 1 });
                Ok(ack(index, id, 1, OpResult::Created))
            }
        }
    }

    async fn update(&self, index: &str, id: &str, body: Value) -> SearchResult<Ack> {
        let mut store = self.store.write().await;
        let document = store
            .get_mut(index)
            .and_then(|index_map| index_map.get_mut(id))
            .ok_or_else(|| document_missing(index, id))?;

        if let Some(patch) = body.get("doc") {
            let mut merged = document.source.clone();
            merge(&mut merged, patch);

            if merged == document.source {
                return Ok(ack(index, id, document.version, OpResult::Noop));
            }

            document.source = merged;
            document.version += 1;
            return Ok(ack(index, id, document.version, OpResult::Updated));
        }

        if let Some(script) = body.get("script") {
            let op = script::recognize(script)
                .map_err(|reason| bad_request("illegal_argument_exception", &reason))?;
            script::apply(&mut document.source, op)
                .map_err(|reason| bad_request("illegal_argument_exception", &reason))?;

            // Scripted updates always reindex, even when nothing changed.
            document.version += 1;
            return Ok(ack(index, id, document.version, OpResult::Updated));
        }

        Err(bad_request(
            "action_request_validation_exception",
            "update carries neither doc nor script",
        ))
    }

    async fn delete(&self, index: &str, id: &str) -> SearchResult<Ack> {
        let mut store = self.store.write().await;

        match store.get_mut(index).and_then(|index_map| index_map.remove(id)) {
            Some(document) => Ok(ack(index, id, document.version + 1, OpResult::Deleted)),
            None => Err(SearchStoreError::Backend {
                status: 404,
                body: json!({
                    "_index": index,
                    "_id": id,
                    "result": OpResult::NotFound.as_str(),
                })
                .to_string(),
            }),
        }
    }

    async fn get(&self, index: &str, id: &str) -> SearchResult<GetResponse> {
        let store = self.store.read().await;

        match store.get(index).and_then(|index_map| index_map.get(id)) {
            Some(document) => Ok(GetResponse {
                index: index.to_string(),
                id: id.to_string(),
                version: document.version,
                source: document.source.clone(),
            }),
            None => Err(not_found(index, id)),
        }
    }

    async fn get_source(&self, index: &str, id: &str) -> SearchResult<Vec<u8>> {
        let store = self.store.read().await;

        match store.get(index).and_then(|index_map| index_map.get(id)) {
            Some(document) => Ok(serde_json::to_vec(&document.source)?),
            None => Err(not_found(index, id)),
        }
    }

    async fn exists(&self, index: &str, id: &str) -> SearchResult<bool> {
        let store = self.store.read().await;

        Ok(store
            .get(index)
            .is_some_and(|index_map| index_map.contains_key(id)))
    }

    async fn search(&self, index: &str, body: Value, size: i64) -> SearchResult<Vec<u8>> {
        if size < 0 {
            return Err(bad_request(
                "illegal_argument_exception",
                "size must be non-negative",
            ));
        }

        let store = self.store.read().await;
        let empty = IndexMap::new();
        let index_map = store.get(index).unwrap_or(&empty);

        let mut matched = Vec::new();
        for (id, document) in index_map {
            let is_match = DocumentEvaluator::new(&document.source)
                .matches(&body)
                .map_err(|reason| bad_request("parsing_exception", &reason))?;

            if is_match {
                matched.push((id, document));
            }
        }

        // HashMap iteration order is arbitrary; sort for reproducible hits.
        matched.sort_by(|a, b| a.0.cmp(b.0));

        let total = matched.len();
        let hits = matched
            .into_iter()
            .take(size as usize)
            .map(|(id, document)| {
                json!({
                    "_index": index,
                    "_id": id,
                    "_score": null,
                    "_source": document.source,
                })
            })
            .collect::<Vec<_>>();

        let response = json!({
            "took": 0,
            "timed_out": false,
            "hits": {
                "total": { "value": total, "relation": "eq" },
                "max_score": null,
                "hits": hits,
            },
        });

        Ok(serde_json::to_vec(&response)?)
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// Currently a no-op builder, but can be extended in future versions
/// to support configuration options like capacity hints.
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl SearchBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds and returns a new [`InMemoryStore`] instance.
    ///
    /// This always succeeds and returns a freshly initialized store.
    async fn build(self) -> SearchResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
