//! Main search store interface for interacting with search backends.
//!
//! This module provides the primary API for working with search stores. It exposes two main store types:
//!
//! - [`SearchStore`] - Typed store for working with a specific backend implementation
//! - [`DynSearchStore`] - Dynamic dispatch store for runtime backend selection
//! - [`DynSearchStoreRef`] - Reference-based store for temporary use
//!
//! Additionally, it provides conversion traits for flexible store type handling.
//!
//! # Example
//!
//! ```ignore
//! use searchlayer::store::SearchStore;
//! use searchlayer::document::Document;
//!
//! let store = SearchStore::new(backend);
//! let index = store.typed_index::<MyDocument>();
//! ```

use crate::{
    backend::{DynSearchBackend, SearchBackend},
    document::Document,
    index::{DynIndexHandle, DynTypedIndexHandle, IndexHandle, TypedIndexHandle},
};

/// A strongly-typed search store bound to a specific backend implementation.
///
/// This struct provides access to a search store with compile-time knowledge of the backend type.
/// It enables type-safe operations and full backend optimization.
///
/// # Type Parameters
///
/// * `B` - The backend implementation type
///
/// # Example
///
/// ```ignore
/// let store = SearchStore::new(my_backend);
/// let articles = store.typed_index::<Article>();
/// ```
#[derive(Debug)]
pub struct SearchStore<B: SearchBackend> {
    backend: B,
}

impl<B: SearchBackend> SearchStore<B> {
    /// Creates a new search store with the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Gets a typed index handle for the specified document type.
    ///
    /// The index name is determined by the document type's `index_name()` method.
    pub fn typed_index<'a, D: Document>(&'a self) -> TypedIndexHandle<'a, B, D> {
        TypedIndexHandle::new(D::index_name().to_string(), &self.backend)
    }

    /// Gets an untyped index handle with the given name.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the index
    pub fn index<'a>(&'a self, name: &str) -> IndexHandle<'a, B> {
        IndexHandle::new(name.to_string(), &self.backend)
    }
}

#[derive(Debug)]
pub struct DynSearchStore {
    backend: Box<dyn DynSearchBackend>,
}

impl DynSearchStore {
    /// Creates a new dynamic search store with the given backend trait object.
    pub fn new(backend: Box<dyn DynSearchBackend>) -> Self {
        Self { backend }
    }

    /// Gets a typed index handle for the specified document type.
    pub fn typed_index<'a, D: Document>(&'a self) -> DynTypedIndexHandle<'a, D> {
        DynTypedIndexHandle::new(D::index_name().to_string(), &*self.backend)
    }

    /// Gets an untyped index handle with the given name.
    pub fn index<'a>(&'a self, name: &str) -> DynIndexHandle<'a> {
        DynIndexHandle::new(name.to_string(), &*self.backend)
    }
}

#[derive(Debug)]
pub struct DynSearchStoreRef<'a> {
    backend: &'a dyn DynSearchBackend,
}

impl<'a> DynSearchStoreRef<'a> {
    /// Creates a reference to a dynamic search store.
    pub fn new(backend: &'a dyn DynSearchBackend) -> Self {
        Self { backend }
    }

    /// Gets a typed index handle for the specified document type.
    pub fn typed_index<D: Document>(&'a self) -> DynTypedIndexHandle<'a, D> {
        DynTypedIndexHandle::new(D::index_name().to_string(), self.backend)
    }

    /// Gets an untyped index handle with the given name.
    pub fn index(&'a self, name: &str) -> DynIndexHandle<'a> {
        DynIndexHandle::new(name.to_string(), self.backend)
    }
}

/// Conversion trait for converting a search store to a dynamic reference.
///
/// This trait allows converting any store type to a [`DynSearchStoreRef`] for runtime polymorphism.
pub trait AsDynSearchStore {
    /// Converts this store to a dynamic reference.
    fn as_dyn<'a>(&'a self) -> DynSearchStoreRef<'a>;
}

/// Conversion trait for converting a search store into a dynamic owned store.
///
/// This trait allows converting any store type to a [`DynSearchStore`] for runtime polymorphism.
pub trait IntoDynSearchStore {
    /// Converts this store into a dynamic owned store.
    fn into_dyn(self) -> DynSearchStore;
}

impl<B: SearchBackend + 'static> AsDynSearchStore for SearchStore<B> {
    fn as_dyn<'a>(&'a self) -> DynSearchStoreRef<'a> {
        DynSearchStoreRef::new(&self.backend)
    }
}

impl<B: SearchBackend + 'static> AsDynSearchStore for &'_ SearchStore<B> {
    fn as_dyn<'a>(&'a self) -> DynSearchStoreRef<'a> {
        DynSearchStoreRef::new(&self.backend)
    }
}

impl AsDynSearchStore for DynSearchStore {
    fn as_dyn<'a>(&'a self) -> DynSearchStoreRef<'a> {
        DynSearchStoreRef::new(&*self.backend)
    }
}

impl<'a> AsDynSearchStore for DynSearchStoreRef<'a> {
    fn as_dyn<'b>(&'b self) -> DynSearchStoreRef<'b> {
        DynSearchStoreRef::new(self.backend)
    }
}

impl<B: SearchBackend + 'static> IntoDynSearchStore for SearchStore<B> {
    fn into_dyn(self) -> DynSearchStore {
        DynSearchStore::new(Box::new(self.backend))
    }
}

impl IntoDynSearchStore for DynSearchStore {
    fn into_dyn(self) -> DynSearchStore {
        self
    }
}

pub trait AsStaticSearchStore {
    fn as_static<'a, B>(&'a self) -> Option<SearchStore<&'a B>>
    where
        B: SearchBackend + 'static;
}

pub trait IntoStaticSearchStore {
    fn into_static<B>(self) -> Option<SearchStore<B>>
    where
        B: SearchBackend + 'static;
}

impl AsStaticSearchStore for DynSearchStore {
    fn as_static<'a, B>(&'a self) -> Option<SearchStore<&'a B>>
    where
        B: SearchBackend + 'static,
    {
        self.backend
            .as_any()
            .downcast_ref::<B>()
            .map(|b| SearchStore::new(b))
    }
}

impl<'a> AsStaticSearchStore for DynSearchStoreRef<'a> {
    fn as_static<'b, B>(&'b self) -> Option<SearchStore<&'b B>>
    where
        B: SearchBackend + 'static,
    {
        self.backend
            .as_any()
            .downcast_ref::<B>()
            .map(|b| SearchStore::new(b))
    }
}

impl IntoStaticSearchStore for DynSearchStore {
    fn into_static<B>(self) -> Option<SearchStore<B>>
    where
        B: SearchBackend + 'static,
    {
        self.backend
            .into_any()
            .downcast::<B>()
            .ok()
            .map(|b| SearchStore::new(*b))
    }
}
