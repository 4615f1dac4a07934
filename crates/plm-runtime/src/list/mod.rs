//! Cached, write-through lists
//!
//! Every list kind shares one implementation, [`CachedList`], parameterized
//! by an [`OrderingStrategy`]. Callers normally hold lists as
//! [`ListHandle`]s obtained from the registry.

mod cached;
mod ordering;

pub use cached::CachedList;
pub use ordering::{OrderingStrategy, PriorityOrdering, QueueOrdering, StackOrdering};

use async_trait::async_trait;
use plm_core::{Item, ListEventListener, ListKind, ListResult, ListenerId};
use std::fmt;
use std::sync::Arc;

/// First in, first out list
pub type PersistentQueue = CachedList<QueueOrdering>;

/// Last in, first out list
pub type PersistentStack = CachedList<StackOrdering>;

/// Highest priority first list
pub type PriorityQueue = CachedList<PriorityOrdering>;

/// Shared handle to a list of any kind
pub type ListHandle = Arc<dyn PersistentList>;

/// An ordered collection whose changes are written through to storage
///
/// Mutations and reads wait for any operation in progress on the same list,
/// including its provider call. [`size`](PersistentList::size) is the
/// exception: it never waits and may lag a mutation that has not committed
/// yet.
#[async_trait]
pub trait PersistentList: Send + Sync {
    /// Persisted list id
    fn id(&self) -> Option<i64>;

    /// Unique list key
    fn key(&self) -> &str;

    fn kind(&self) -> ListKind;

    fn description(&self) -> Option<String>;

    /// Replace the description. Not persisted.
    fn set_description(&self, description: Option<String>);

    /// Add items in order
    ///
    /// The whole batch is validated before anything changes. If storing an
    /// item fails, that item is rolled back and the error returned; items
    /// stored before it stay in the list. Added events are only fired when
    /// the whole batch succeeds.
    async fn add(&self, items: Vec<Item>) -> ListResult<()>;

    /// Insert an item at `index`, clamped to the list size
    ///
    /// Returns the index the item ended up at.
    async fn insert(&self, index: usize, item: Item) -> ListResult<usize>;

    /// Remove the item with the same key as `item`
    ///
    /// Returns `true` if the item was removed from the cache or from storage.
    async fn remove(&self, item: &Item) -> ListResult<bool>;

    /// Remove every item
    async fn clear(&self) -> ListResult<()>;

    /// Snapshot of the items in iteration order
    async fn get_items(&self) -> Vec<Item>;

    /// Item at `index`, `None` when out of range
    async fn get_item_at(&self, index: usize) -> Option<Item>;

    /// The next item, without removing it
    async fn get_next(&self) -> Option<Item>;

    /// Remove and return the next item
    async fn get_next_and_remove(&self) -> ListResult<Option<Item>>;

    /// Number of cached items
    fn size(&self) -> usize;

    /// Stop accepting changes
    ///
    /// Waits for any operation in progress. Afterwards every mutation fails
    /// with [`ListError::Closed`](plm_core::ListError::Closed); reads keep
    /// returning the last cached items. The registry closes a list before
    /// deleting it from storage.
    async fn close(&self);

    /// Accept changes again after [`close`](PersistentList::close)
    async fn reopen(&self);

    fn is_closed(&self) -> bool;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn add_event_listener(&self, listener: Arc<dyn ListEventListener>) -> ListenerId;

    /// Returns `false` if the listener was not registered
    fn remove_event_listener(&self, id: ListenerId) -> bool;
}

impl fmt::Debug for dyn PersistentList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistentList")
            .field("id", &self.id())
            .field("key", &self.key())
            .field("kind", &self.kind())
            .field("size", &self.size())
            .finish()
    }
}
