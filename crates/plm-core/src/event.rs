//! Synchronous event dispatch
//!
//! Lists and registries announce every committed change through an
//! [`EventBus`]. Delivery happens on the caller's task, after the lock that
//! guarded the mutation has been released, in the order listeners were
//! subscribed.
//!
//! Dispatch works on a snapshot of the subscribers taken when the event is
//! fired: a listener removed while an event is being delivered still gets
//! that event, and a listener added meanwhile does not. A listener that
//! returns an error is logged and skipped; the remaining listeners are still
//! called and the triggering operation still succeeds.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::item::Item;
use crate::record::ListRef;

/// Handle returned when subscribing, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Ordered set of subscribers of one listener type
pub struct EventBus<L: ?Sized> {
    next_id: AtomicU64,
    listeners: RwLock<Vec<(ListenerId, Arc<L>)>>,
}

impl<L: ?Sized> EventBus<L> {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Register a listener; it receives events fired from now on
    pub fn subscribe(&self, listener: Arc<L>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, listener));
        id
    }

    /// Remove a listener. Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }

    /// Deliver an event to every current subscriber
    ///
    /// Returns the number of listeners that reported a failure.
    pub fn dispatch<F>(&self, event_name: &str, mut deliver: F) -> usize
    where
        F: FnMut(&L) -> anyhow::Result<()>,
    {
        let snapshot: Vec<(ListenerId, Arc<L>)> = self.listeners.read().clone();

        let mut failures = 0;
        for (id, listener) in snapshot {
            if let Err(e) = deliver(listener.as_ref()) {
                failures += 1;
                tracing::warn!(
                    "Listener {:?} failed while handling '{}': {:#}",
                    id,
                    event_name,
                    e
                );
            }
        }
        failures
    }
}

impl<L: ?Sized> Default for EventBus<L> {
    fn default() -> Self {
        Self::new()
    }
}

/// The list operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListOperation {
    /// An item was added to the list
    Added,
    /// An item was removed from the list
    Removed,
    /// All items were cleared from the list
    Cleared,
}

impl ListOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListOperation::Added => "item_added",
            ListOperation::Removed => "item_removed",
            ListOperation::Cleared => "list_cleared",
        }
    }
}

/// A committed change to a list
///
/// `item` is only `None` for [`ListOperation::Cleared`]. `index` is the
/// position the item was given in the list's iteration order, and is only
/// set for additions.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEvent {
    source: ListRef,
    item: Option<Item>,
    index: Option<usize>,
    operation: ListOperation,
}

impl ListEvent {
    pub fn added(source: ListRef, item: Item, index: usize) -> Self {
        Self {
            source,
            item: Some(item),
            index: Some(index),
            operation: ListOperation::Added,
        }
    }

    pub fn removed(source: ListRef, item: Item) -> Self {
        Self {
            source,
            item: Some(item),
            index: None,
            operation: ListOperation::Removed,
        }
    }

    pub fn cleared(source: ListRef) -> Self {
        Self {
            source,
            item: None,
            index: None,
            operation: ListOperation::Cleared,
        }
    }

    /// The list on which the event occurred
    pub fn source(&self) -> &ListRef {
        &self.source
    }

    pub fn item(&self) -> Option<&Item> {
        self.item.as_ref()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn operation(&self) -> ListOperation {
        self.operation
    }
}

/// Observer of list changes
///
/// Every method has a no-op default so implementors only override what they
/// care about.
pub trait ListEventListener: Send + Sync {
    fn item_added(&self, _event: &ListEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn item_removed(&self, _event: &ListEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn list_cleared(&self, _event: &ListEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

impl EventBus<dyn ListEventListener> {
    /// Route a list event to the matching listener method
    pub fn fire(&self, event: &ListEvent) -> usize {
        self.dispatch(event.operation().as_str(), |listener| {
            match event.operation() {
                ListOperation::Added => listener.item_added(event),
                ListOperation::Removed => listener.item_removed(event),
                ListOperation::Cleared => listener.list_cleared(event),
            }
        })
    }
}
