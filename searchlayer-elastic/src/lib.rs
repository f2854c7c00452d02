//! Elasticsearch transport backend for searchlayer.
//!
//! This crate implements the `SearchBackend` trait over the HTTP API of an
//! Elasticsearch-compatible cluster using the `opensearch` client. All
//! payloads are rendered by the client layer; this crate transports them
//! and classifies failures without retrying.
//!
//! # Features
//!
//! - `rustls` (default) - TLS through rustls
//! - `native-tls` - TLS through the platform library
//!
//! # Quick Start
//!
//! ```ignore
//! use searchlayer::SearchStore;
//! use searchlayer_elastic::{ElasticConfig, ElasticStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = ElasticStore::connect(ElasticConfig::from_env()).await?;
//!     let store = SearchStore::new(backend);
//!     let articles = store.index("articles");
//!
//!     println!("{}", articles.exists("a-1").await?);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as searchlayer_elastic;

pub mod config;
pub mod store;

pub use config::ElasticConfig;
pub use store::{ElasticStore, ElasticStoreBuilder};
