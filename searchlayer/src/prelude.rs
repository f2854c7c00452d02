//! Convenient re-exports of commonly used types from searchlayer.
//!
//! Import this prelude module to quickly access the most frequently used types
//! and traits without needing to import from multiple sub-modules:
//!
//! ```ignore
//! use searchlayer::prelude::*;
//! ```
//!
//! This provides access to:
//! - Document traits and response types
//! - Search backends and builders
//! - Query and script construction
//! - Index handles and store interfaces
//! - Error types

pub use searchlayer_core::{
    backend::{DynSearchBackend, SearchBackend, SearchBackendBuilder},
    document::{Ack, Document, DocumentExt, GetResponse, OpResult, SearchHit, SearchResponse},
    error::{SearchResult, SearchStoreError},
    index::{DynIndexHandle, DynTypedIndexHandle, IndexHandle, TypedIndexHandle},
    query::{DEFAULT_SIZE, IdRange, SearchQuery},
    script::ArrayMutation,
    store::{
        AsDynSearchStore, AsStaticSearchStore, DynSearchStore, DynSearchStoreRef,
        IntoDynSearchStore, IntoStaticSearchStore, SearchStore,
    },
};
