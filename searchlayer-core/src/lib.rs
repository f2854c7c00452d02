//! A thin client layer over Elasticsearch-compatible document stores, providing a unified interface for indexing, updating, and searching JSON documents.
//!
//! This crate is the core of the searchlayer project and provides:
//!
//! - **Document traits** ([`document`]) - Core traits for defining documents and decoding responses
//! - **Search backend abstraction** ([`backend`]) - Traits for implementing different transport backends
//! - **Query construction** ([`query`]) - Boolean filter query building with a fixed, reproducible clause order
//! - **Array mutation scripts** ([`script`]) - Server-side append, replace, and remove operations on array fields
//! - **Index handles** ([`index`]) - High-level API for interacting with a single index
//! - **Search store** ([`store`]) - Main interface for working with typed or untyped documents
//! - **Error handling** ([`error`]) - Comprehensive error types and result types
//!
//! # Example
//!
//! ```ignore
//! use searchlayer::{Document, SearchStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct Article {
//!     pub id: i64,
//!     pub text: String,
//! }
//!
//! impl Document for Article {
//!     fn id(&self) -> String {
//!         self.id.to_string()
//!     }
//!
//!     fn index_name() -> &'static str {
//!         "articles"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as searchlayer_core;

pub mod backend;
pub mod document;
pub mod error;
pub mod index;
pub mod query;
pub mod script;
pub mod store;
