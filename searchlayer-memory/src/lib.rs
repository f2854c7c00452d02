//! In-memory search backend for searchlayer.
//!
//! This crate provides a thread-safe, in-memory implementation of the `SearchBackend` trait.
//! It uses async-aware read-write locks for concurrent access and replays the payload
//! shapes the client layer produces, making it ideal for development and tests that
//! should not depend on a running cluster.
//!
//! # Features
//!
//! - **Thread-safe access** - Concurrent reads and writes using async-aware RwLock
//! - **Cluster-faithful semantics** - Versioning, `noop` detection, and 404 behavior match a real cluster
//! - **Script replay** - Recognizes the emitted array mutation scripts and applies them
//! - **Query evaluation** - Evaluates rendered boolean filter bodies with a full scan
//!
//! # Quick Start
//!
//! ```ignore
//! use searchlayer::{SearchStore, memory::InMemoryStore};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SearchStore::new(InMemoryStore::new());
//!     let articles = store.index("articles");
//!
//!     articles.create("a-1", json!({ "id": 1, "text": "hello" })).await?;
//!     assert!(articles.exists("a-1").await?);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as searchlayer_memory;

pub mod evaluator;
pub mod script;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
