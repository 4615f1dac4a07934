//! Named-list registry
//!
//! The registry is the process-wide directory of lists. It starts unloaded
//! and rejects every call except [`ListRegistry::load`] until loading
//! completes. Lookups of existing lists take a short read lock on the map;
//! creation, removal and loading are serialized by a separate async lock
//! that is held across the registry provider call.

mod factory;

pub use factory::{cached_list, ListConstructor, ListFactory};

use parking_lot::RwLock;
use plm_core::{validate_key, EventBus, ListError, ListKind, ListRecord, ListResult, ListenerId};
use plm_repository::{ItemProvider, Providers, RegistryProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::list::{ListHandle, PersistentList};

/// The registry operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryOperation {
    /// A list was added to the registry
    Added,
    /// A list was removed from the registry
    Removed,
}

impl RegistryOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryOperation::Added => "list_added",
            RegistryOperation::Removed => "list_removed",
        }
    }
}

/// A list was added to or removed from the registry
#[derive(Debug, Clone)]
pub struct RegistryEvent {
    source: String,
    list: ListHandle,
    operation: RegistryOperation,
}

impl RegistryEvent {
    pub fn new(source: impl Into<String>, list: ListHandle, operation: RegistryOperation) -> Self {
        Self {
            source: source.into(),
            list,
            operation,
        }
    }

    /// Name of the registry that fired the event
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The affected list
    pub fn list(&self) -> &ListHandle {
        &self.list
    }

    pub fn operation(&self) -> RegistryOperation {
        self.operation
    }
}

/// Observer of registry changes
pub trait RegistryEventListener: Send + Sync {
    fn list_added(&self, _event: &RegistryEvent) -> anyhow::Result<()> {
        Ok(())
    }

    fn list_removed(&self, _event: &RegistryEvent) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Name given to a registry unless [`ListRegistry::named`] is used
pub const DEFAULT_REGISTRY_NAME: &str = "default";

/// Directory of named lists
pub struct ListRegistry {
    name: String,
    registry_provider: Arc<dyn RegistryProvider>,
    item_provider: Arc<dyn ItemProvider>,
    factory: ListFactory,
    lists: RwLock<HashMap<String, ListHandle>>,
    write_lock: Mutex<()>,
    loaded: AtomicBool,
    listeners: EventBus<dyn RegistryEventListener>,
}

impl ListRegistry {
    /// Create an unloaded registry that supports every built-in kind
    pub fn new(providers: &Providers) -> Self {
        Self::with_factory(providers, ListFactory::new())
    }

    /// Create an unloaded registry that constructs lists with `factory`
    pub fn with_factory(providers: &Providers, factory: ListFactory) -> Self {
        Self {
            name: DEFAULT_REGISTRY_NAME.to_string(),
            registry_provider: providers.registry.clone(),
            item_provider: providers.items.clone(),
            factory,
            lists: RwLock::new(HashMap::new()),
            write_lock: Mutex::new(()),
            loaded: AtomicBool::new(false),
            listeners: EventBus::new(),
        }
    }

    /// Rename the registry; the name is reported as the source of its events
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    pub fn factory(&self) -> &ListFactory {
        &self.factory
    }

    /// Load every stored list and mark the registry loaded
    ///
    /// Stored lists whose kind the factory cannot construct are logged and
    /// skipped. Any other failure leaves the registry unloaded. Calling this
    /// again after a successful load does nothing.
    pub async fn load(&self) -> ListResult<()> {
        let _guard = self.write_lock.lock().await;
        if self.is_loaded() {
            debug!("List registry already loaded");
            return Ok(());
        }

        let records = self.registry_provider.get_lists().await?;

        let mut lists = HashMap::with_capacity(records.len());
        let mut skipped = 0;
        for record in records {
            let Some(kind) = self.factory.resolve(&record.kind) else {
                warn!(
                    "Skipping list '{}': unsupported list kind '{}'",
                    record.key, record.kind
                );
                skipped += 1;
                continue;
            };

            let list = self
                .factory
                .construct(kind, record, self.item_provider.clone())
                .await?;
            lists.insert(list.key().to_string(), list);
        }

        info!(
            "Loaded {} lists from {} ({} skipped)",
            lists.len(),
            self.item_provider.name(),
            skipped
        );

        *self.lists.write() = lists;
        self.loaded.store(true, Ordering::Release);
        Ok(())
    }

    /// Get the list for `key`, creating it if it does not exist
    ///
    /// An existing list is returned as is; its kind and description are not
    /// checked or changed.
    pub async fn ensure_list(
        &self,
        kind: ListKind,
        key: &str,
        description: Option<String>,
    ) -> ListResult<ListHandle> {
        self.check_loaded()?;
        validate_key(key, "list")?;
        self.check_kind(kind)?;

        if let Some(list) = self.cached(key) {
            return Ok(list);
        }

        let _guard = self.write_lock.lock().await;
        if let Some(list) = self.cached(key) {
            return Ok(list);
        }

        self.create_locked(kind, key, description).await
    }

    /// Create a new list
    ///
    /// Fails with [`ListError::DuplicateList`] if `key` is taken.
    pub async fn create_list(
        &self,
        kind: ListKind,
        key: &str,
        description: Option<String>,
    ) -> ListResult<ListHandle> {
        self.check_loaded()?;
        validate_key(key, "list")?;
        self.check_kind(kind)?;

        let _guard = self.write_lock.lock().await;
        if self.cached(key).is_some() {
            return Err(ListError::DuplicateList {
                key: key.to_string(),
            });
        }

        self.create_locked(kind, key, description).await
    }

    /// Remove the list for `key` together with its stored items
    ///
    /// The removed list is closed, so handles still held elsewhere reject
    /// further changes. Returns `false`, without firing an event, if there is
    /// no such list.
    pub async fn remove_list(&self, key: &str) -> ListResult<bool> {
        self.check_loaded()?;
        validate_key(key, "list")?;

        let _guard = self.write_lock.lock().await;
        let Some(list) = self.cached(key) else {
            return Ok(false);
        };

        // Close first so no in-flight change lands after the stored items
        // are deleted
        list.close().await;
        if let Err(e) = self.registry_provider.remove_list(key).await {
            list.reopen().await;
            return Err(e.into());
        }
        self.lists.write().remove(key);
        info!("Removed list '{}'", key);

        self.fire(RegistryEvent::new(&self.name, list, RegistryOperation::Removed));
        Ok(true)
    }

    /// Snapshot of all lists, sorted by key
    pub fn get_lists(&self) -> ListResult<Vec<ListHandle>> {
        self.check_loaded()?;

        let mut lists: Vec<ListHandle> = self.lists.read().values().cloned().collect();
        lists.sort_by(|a, b| a.key().cmp(b.key()));
        Ok(lists)
    }

    /// The list for `key`, if any
    pub fn get_list(&self, key: &str) -> ListResult<Option<ListHandle>> {
        self.check_loaded()?;
        validate_key(key, "list")?;
        Ok(self.cached(key))
    }

    pub fn add_event_listener(&self, listener: Arc<dyn RegistryEventListener>) -> ListenerId {
        self.listeners.subscribe(listener)
    }

    pub fn remove_event_listener(&self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn check_loaded(&self) -> ListResult<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(ListError::NotLoaded)
        }
    }

    fn check_kind(&self, kind: ListKind) -> ListResult<()> {
        if self.factory.supports(kind) {
            Ok(())
        } else {
            Err(ListError::Validation(format!(
                "The list kind '{}' is not supported.",
                kind
            )))
        }
    }

    fn cached(&self, key: &str) -> Option<ListHandle> {
        self.lists.read().get(key).cloned()
    }

    /// Store, open and register a new list; the caller holds the write lock
    async fn create_locked(
        &self,
        kind: ListKind,
        key: &str,
        description: Option<String>,
    ) -> ListResult<ListHandle> {
        let record = ListRecord::new(key, kind).with_description(description);
        let id = self.registry_provider.add_list(&record).await?;
        let record = record.with_id(id);

        let list = match self
            .factory
            .construct(kind, record, self.item_provider.clone())
            .await
        {
            Ok(list) => list,
            Err(e) => {
                if let Err(cleanup) = self.registry_provider.remove_list(key).await {
                    warn!(
                        "Failed to remove stored list '{}' after open failed: {}",
                        key, cleanup
                    );
                }
                return Err(e);
            }
        };

        self.lists.write().insert(key.to_string(), list.clone());
        info!("Created {} list '{}'", kind, key);

        self.fire(RegistryEvent::new(
            &self.name,
            list.clone(),
            RegistryOperation::Added,
        ));
        Ok(list)
    }

    fn fire(&self, event: RegistryEvent) {
        self.listeners
            .dispatch(event.operation().as_str(), |listener| {
                match event.operation() {
                    RegistryOperation::Added => listener.list_added(&event),
                    RegistryOperation::Removed => listener.list_removed(&event),
                }
            });
    }
}
