//! The shared list implementation

use async_trait::async_trait;
use parking_lot::RwLock;
use plm_core::{
    validate_key, EventBus, Item, ItemRecord, ListError, ListEvent, ListEventListener, ListKind,
    ListRecord, ListRef, ListResult, ListenerId, OrderUpdate,
};
use plm_repository::ItemProvider;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{OrderingStrategy, PersistentList};

/// Cache and key index, always changed together
#[derive(Default)]
struct ListState {
    items: Vec<Item>,
    keys: HashSet<String>,
}

impl ListState {
    fn insert(&mut self, slot: usize, item: Item) {
        self.keys.insert(item.key().to_string());
        self.items.insert(slot, item);
    }

    fn remove(&mut self, slot: usize) -> Item {
        let item = self.items.remove(slot);
        self.keys.remove(item.key());
        item
    }

    fn position(&self, key: &str) -> Option<usize> {
        if !self.keys.contains(key) {
            return None;
        }
        self.items.iter().position(|item| item.key() == key)
    }
}

/// A list that caches its items and writes every change through to an
/// [`ItemProvider`]
///
/// The state lock is held for the full duration of every operation except
/// [`size`](PersistentList::size), including the provider call. Events are
/// fired after the lock is released.
pub struct CachedList<S: OrderingStrategy> {
    list: ListRef,
    description: RwLock<Option<String>>,
    provider: Arc<dyn ItemProvider>,
    strategy: S,
    state: Mutex<ListState>,
    size: AtomicUsize,
    closed: AtomicBool,
    listeners: EventBus<dyn ListEventListener>,
}

impl<S: OrderingStrategy> CachedList<S> {
    /// Open the list described by `record`, loading its stored items
    pub async fn open(record: ListRecord, provider: Arc<dyn ItemProvider>) -> ListResult<Self> {
        validate_key(&record.key, "list")?;

        let list = record.list_ref();
        let strategy = S::default();

        let records = provider.get_items(&list).await?;
        let loaded: Vec<Item> = records.into_iter().map(Item::from).collect();

        let mut state = ListState::default();
        for item in strategy.initialize_cache(loaded) {
            if state.keys.contains(item.key()) {
                warn!(
                    "Skipping duplicate stored item '{}' in list '{}'",
                    item.key(),
                    list.key
                );
                continue;
            }
            let slot = state.items.len();
            state.insert(slot, item);
        }

        debug!(
            "Initialized {} list '{}' with {} items from {}",
            S::KIND,
            list.key,
            state.items.len(),
            provider.name()
        );

        Ok(Self {
            list,
            description: RwLock::new(record.description),
            provider,
            strategy,
            size: AtomicUsize::new(state.items.len()),
            state: Mutex::new(state),
            closed: AtomicBool::new(false),
            listeners: EventBus::new(),
        })
    }

    /// Provider reference for this list
    pub fn list_ref(&self) -> &ListRef {
        &self.list
    }

    fn record_for(&self, item: &Item, slot: usize) -> ItemRecord {
        let (secondary, tertiary) = self.strategy.secondary_orders(item);
        ItemRecord::new(&self.list, item, self.strategy.compute_order(slot))
            .with_secondary_orders(secondary, tertiary)
    }

    /// New orders for every item from `from` onwards
    fn reindex(&self, items: &[Item], from: usize) -> Vec<OrderUpdate> {
        items
            .iter()
            .enumerate()
            .skip(from)
            .map(|(slot, item)| OrderUpdate::new(item.key(), self.strategy.compute_order(slot)))
            .collect()
    }

    /// Checked with the state lock held, after any close has completed
    fn check_open(&self) -> ListResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(ListError::Closed {
                key: self.list.key.clone(),
            })
        } else {
            Ok(())
        }
    }

    fn validate_batch(&self, state: &ListState, items: &[Item]) -> ListResult<()> {
        let mut batch = HashSet::with_capacity(items.len());
        for item in items {
            validate_key(item.key(), "item")?;
            if state.keys.contains(item.key()) || !batch.insert(item.key()) {
                return Err(ListError::DuplicateItem {
                    list: self.list.key.clone(),
                    key: item.key().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Cache `item` at `slot` and store it, rolling the cache back if the
    /// provider fails
    ///
    /// Returns the stored item and its view index.
    async fn store(
        &self,
        state: &mut ListState,
        mut item: Item,
        slot: usize,
    ) -> ListResult<(Item, usize)> {
        let record = self.record_for(&item, slot);
        state.insert(slot, item.clone());
        let reindex = self.reindex(&state.items, slot + 1);

        match self.provider.add(&record, &reindex).await {
            Ok(id) => {
                item.set_id(Some(id));
                state.items[slot].set_id(Some(id));
                self.size.store(state.items.len(), Ordering::Release);
                Ok((item, self.strategy.view_index(state.items.len(), slot)))
            }
            Err(e) => {
                state.remove(slot);
                warn!(
                    "Rolled back item '{}' in list '{}': {}",
                    item.key(),
                    self.list.key,
                    e
                );
                Err(ListError::Storage(e))
            }
        }
    }

    /// Remove the item at `slot` from the cache and storage, restoring it if
    /// the provider fails
    ///
    /// Returns the removed item.
    async fn delete(&self, state: &mut ListState, slot: usize) -> ListResult<Item> {
        let item = state.remove(slot);
        let record = self.record_for(&item, slot);
        let reindex = self.reindex(&state.items, slot);

        match self.provider.remove(&record, &reindex).await {
            Ok(_) => {
                self.size.store(state.items.len(), Ordering::Release);
                Ok(item)
            }
            Err(e) => {
                warn!(
                    "Restored item '{}' in list '{}' after failed removal: {}",
                    item.key(),
                    self.list.key,
                    e
                );
                state.insert(slot, item);
                Err(ListError::Storage(e))
            }
        }
    }

    fn fire(&self, event: ListEvent) {
        self.listeners.fire(&event);
    }
}

#[async_trait]
impl<S: OrderingStrategy> PersistentList for CachedList<S> {
    fn id(&self) -> Option<i64> {
        self.list.id
    }

    fn key(&self) -> &str {
        &self.list.key
    }

    fn kind(&self) -> ListKind {
        S::KIND
    }

    fn description(&self) -> Option<String> {
        self.description.read().clone()
    }

    fn set_description(&self, description: Option<String>) {
        *self.description.write() = description;
    }

    async fn add(&self, items: Vec<Item>) -> ListResult<()> {
        let mut state = self.state.lock().await;
        self.check_open()?;
        self.validate_batch(&state, &items)?;

        let mut committed = Vec::with_capacity(items.len());
        let mut failure = None;
        for item in items {
            let slot = self.strategy.add_at(&state.items, &item);
            match self.store(&mut state, item, slot).await {
                Ok(stored) => committed.push(stored),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        drop(state);

        if let Some(e) = failure {
            return Err(e);
        }

        for (item, index) in committed {
            self.fire(ListEvent::added(self.list.clone(), item, index));
        }
        Ok(())
    }

    async fn insert(&self, index: usize, item: Item) -> ListResult<usize> {
        let mut state = self.state.lock().await;
        self.check_open()?;
        self.validate_batch(&state, std::slice::from_ref(&item))?;

        let index = index.min(state.items.len());
        let slot = self.strategy.insert_at(&state.items, &item, index);
        let (item, index) = self.store(&mut state, item, slot).await?;
        drop(state);

        self.fire(ListEvent::added(self.list.clone(), item, index));
        Ok(index)
    }

    async fn remove(&self, item: &Item) -> ListResult<bool> {
        let mut state = self.state.lock().await;
        self.check_open()?;

        let removed = match state.position(item.key()) {
            Some(slot) => Some(self.delete(&mut state, slot).await?),
            None => {
                // Not cached; storage may still hold it
                let record = self.record_for(item, state.items.len());
                let stored = self.provider.remove(&record, &[]).await?;
                stored.then(|| item.clone())
            }
        };
        drop(state);

        match removed {
            Some(item) => {
                self.fire(ListEvent::removed(self.list.clone(), item));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self) -> ListResult<()> {
        let mut state = self.state.lock().await;
        self.check_open()?;

        self.provider.clear(&self.list).await?;
        state.items.clear();
        state.keys.clear();
        self.size.store(0, Ordering::Release);
        drop(state);

        self.fire(ListEvent::cleared(self.list.clone()));
        Ok(())
    }

    async fn get_items(&self) -> Vec<Item> {
        let state = self.state.lock().await;
        self.strategy.iteration_order(&state.items)
    }

    async fn get_item_at(&self, index: usize) -> Option<Item> {
        let state = self.state.lock().await;
        self.strategy
            .item_at(&state.items, index)
            .map(|slot| state.items[slot].clone())
    }

    async fn get_next(&self) -> Option<Item> {
        let state = self.state.lock().await;
        self.strategy
            .peek_next(&state.items)
            .map(|slot| state.items[slot].clone())
    }

    async fn get_next_and_remove(&self) -> ListResult<Option<Item>> {
        let mut state = self.state.lock().await;
        self.check_open()?;

        let Some(slot) = self.strategy.peek_next(&state.items) else {
            return Ok(None);
        };
        let item = self.delete(&mut state, slot).await?;
        drop(state);

        self.fire(ListEvent::removed(self.list.clone(), item.clone()));
        Ok(Some(item))
    }

    fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    async fn close(&self) {
        let _state = self.state.lock().await;
        self.closed.store(true, Ordering::Release);
        debug!("Closed list '{}'", self.list.key);
    }

    async fn reopen(&self) {
        let _state = self.state.lock().await;
        self.closed.store(false, Ordering::Release);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn add_event_listener(&self, listener: Arc<dyn ListEventListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }
}
