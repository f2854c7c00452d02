//! Main searchlayer crate providing a unified interface for Elasticsearch-compatible document stores.
//!
//! This crate is the primary entry point for users of the searchlayer project.
//! It re-exports the core types and functionality from various sub-crates and provides
//! convenient access to different transport backends.
//!
//! # Features
//!
//! - **Document CRUD** - Create, read, partially update, and delete JSON documents by id
//! - **Array mutations** - Server-side append, replace, and remove on array fields without a read-modify-write cycle
//! - **Reproducible search** - A boolean filter query builder with a fixed clause order
//! - **Multiple backends** - An in-memory backend for tests and an Elasticsearch-compatible HTTP backend
//!
//! # Quick Start
//!
//! ```ignore
//! use searchlayer::{prelude::*, memory::InMemoryStore};
//! use serde::{Serialize, Deserialize};
//! use serde_json::json;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Article {
//!     pub id: i64,
//!     pub text: String,
//! }
//!
//! impl Document for Article {
//!     fn id(&self) -> String { self.id.to_string() }
//!     fn index_name() -> &'static str { "articles" }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create an in-memory backend
//!     let store = SearchStore::new(InMemoryStore::new());
//!
//!     // Get a typed index handle for Article documents
//!     let articles = store.typed_index::<Article>();
//!
//!     let article = Article { id: 1, text: "hello world".to_string() };
//!     articles.create(&article).await.unwrap();
//!
//!     // Partial update touches only the named fields
//!     articles.update("1", json!({ "text": "hello again" })).await.unwrap();
//!
//!     // Search with an id window and a word filter
//!     let hits = articles
//!         .search(&SearchQuery::new().id_range(0, 100).words("hello"))
//!         .await
//!         .unwrap();
//!
//!     println!("found {} articles", hits.len());
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! The `searchlayer` crate also supports dynamic dispatch for scenarios where backend types
//! are not known at compile time. You can convert a typed `SearchStore` into a
//! dynamically dispatched store using the `into_dyn` method. This allows for runtime
//! selection of backends without static type information.
//!
//! ```ignore
//! use searchlayer::{prelude::*, memory::InMemoryStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = SearchStore::new(InMemoryStore::new()).into_dyn();
//!
//!     let articles = store.index("articles");
//!     articles.create("a-1", json!({ "id": 1 })).await.unwrap();
//!
//!     assert!(articles.exists("a-1").await.unwrap());
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Fast in-memory backend for development and testing
//! - [`elastic`] - Elasticsearch-compatible HTTP backend (requires the `elastic` feature)

pub mod prelude;

pub use searchlayer_core::{backend, document, error, index, query, script, store};

// Re-export the JSON value types for convenience
pub use serde_json;

/// In-memory backend implementations.
pub mod memory {
    pub use searchlayer_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// Elasticsearch-compatible HTTP backend implementations.
///
/// This module is only available when the `elastic` feature is enabled.
#[cfg(feature = "elastic")]
pub mod elastic {
    pub use searchlayer_elastic::{ElasticConfig, ElasticStore, ElasticStoreBuilder};
}
