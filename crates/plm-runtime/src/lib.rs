//! Persistent list runtime
//!
//! Lists keep their items in an in-memory cache and write every change
//! through to an [`ItemProvider`](plm_repository::ItemProvider). Each list
//! serializes its operations behind its own lock, including the provider
//! round-trip, so concurrent callers always see a consistent cache.
//!
//! The [`ListRegistry`] is the directory of named lists. It must be loaded
//! once at startup; afterwards lists are created on demand with
//! [`ListRegistry::ensure_list`] and looked up by key.

pub mod list;
pub mod registry;

pub use list::{
    CachedList, ListHandle, OrderingStrategy, PersistentList, PersistentQueue, PersistentStack,
    PriorityOrdering, PriorityQueue, QueueOrdering, StackOrdering,
};
pub use registry::{
    cached_list, ListConstructor, ListFactory, ListRegistry, RegistryEvent, RegistryEventListener,
    RegistryOperation, DEFAULT_REGISTRY_NAME,
};
