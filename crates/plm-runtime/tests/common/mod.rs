//! Common test utilities for runtime integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use plm_core::{
    Item, ItemRecord, ListEvent, ListEventListener, ListKind, ListOperation, ListRecord, ListRef,
    OrderUpdate, ProviderError, ProviderResult,
};
use plm_repository::{ItemProvider, MemoryProvider, Providers, RegistryProvider};
use plm_runtime::{
    CachedList, OrderingStrategy, RegistryEvent, RegistryEventListener, RegistryOperation,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

/// Open a list of kind `S` with id 1 on `provider`
pub async fn open_list<S: OrderingStrategy>(
    provider: Arc<dyn ItemProvider>,
) -> Arc<CachedList<S>> {
    let record = ListRecord::new("test-list", S::KIND).with_id(1);
    Arc::new(CachedList::<S>::open(record, provider).await.unwrap())
}

pub fn items(keys: &[&str]) -> Vec<Item> {
    keys.iter().map(|k| Item::new(*k)).collect()
}

pub fn keys(items: &[Item]) -> Vec<String> {
    items.iter().map(|i| i.key().to_string()).collect()
}

/// One delivered list event
#[derive(Debug, Clone, PartialEq)]
pub struct Seen {
    pub operation: ListOperation,
    pub key: Option<String>,
    pub index: Option<usize>,
}

/// Records every list event it receives
#[derive(Default)]
pub struct RecordingListener {
    seen: Mutex<Vec<Seen>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<Seen> {
        self.seen.lock().clone()
    }

    pub fn count(&self, operation: ListOperation) -> usize {
        self.seen
            .lock()
            .iter()
            .filter(|s| s.operation == operation)
            .count()
    }

    pub fn keys(&self, operation: ListOperation) -> Vec<String> {
        self.seen
            .lock()
            .iter()
            .filter(|s| s.operation == operation)
            .filter_map(|s| s.key.clone())
            .collect()
    }

    fn record(&self, event: &ListEvent) {
        self.seen.lock().push(Seen {
            operation: event.operation(),
            key: event.item().map(|i| i.key().to_string()),
            index: event.index(),
        });
    }
}

impl ListEventListener for RecordingListener {
    fn item_added(&self, event: &ListEvent) -> anyhow::Result<()> {
        self.record(event);
        Ok(())
    }

    fn item_removed(&self, event: &ListEvent) -> anyhow::Result<()> {
        self.record(event);
        Ok(())
    }

    fn list_cleared(&self, event: &ListEvent) -> anyhow::Result<()> {
        self.record(event);
        Ok(())
    }
}

/// Fails every event it receives
pub struct FailingListener;

impl ListEventListener for FailingListener {
    fn item_added(&self, _event: &ListEvent) -> anyhow::Result<()> {
        anyhow::bail!("listener failure")
    }
}

/// Records registry events as (operation, list key), and their sources
#[derive(Default)]
pub struct RegistryRecorder {
    seen: Mutex<Vec<(RegistryOperation, String)>>,
    sources: Mutex<Vec<String>>,
}

impl RegistryRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<(RegistryOperation, String)> {
        self.seen.lock().clone()
    }

    pub fn sources(&self) -> Vec<String> {
        self.sources.lock().clone()
    }

    fn record(&self, event: &RegistryEvent) {
        self.seen
            .lock()
            .push((event.operation(), event.list().key().to_string()));
        self.sources.lock().push(event.source().to_string());
    }
}

impl RegistryEventListener for RegistryRecorder {
    fn list_added(&self, event: &RegistryEvent) -> anyhow::Result<()> {
        self.record(event);
        Ok(())
    }

    fn list_removed(&self, event: &RegistryEvent) -> anyhow::Result<()> {
        self.record(event);
        Ok(())
    }
}

/// Memory provider with switchable failures
#[derive(Default)]
pub struct FlakyProvider {
    inner: MemoryProvider,
    /// Number of adds that succeed before every later add fails
    adds_before_failure: Mutex<Option<usize>>,
    adds: AtomicUsize,
    pub fail_remove: AtomicBool,
    pub fail_clear: AtomicBool,
    pub fail_remove_list: AtomicBool,
}

impl FlakyProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_adds_after(&self, successes: usize) {
        self.adds.store(0, Ordering::SeqCst);
        *self.adds_before_failure.lock() = Some(successes);
    }

    pub fn heal(&self) {
        *self.adds_before_failure.lock() = None;
        self.fail_remove.store(false, Ordering::SeqCst);
        self.fail_clear.store(false, Ordering::SeqCst);
        self.fail_remove_list.store(false, Ordering::SeqCst);
    }

    pub fn providers(self: &Arc<Self>) -> Providers {
        Providers::shared(self.clone())
    }

    fn unavailable() -> ProviderError {
        ProviderError::Unavailable("backend offline".to_string())
    }
}

#[async_trait]
impl ItemProvider for FlakyProvider {
    fn name(&self) -> &str {
        "Flaky Provider"
    }

    async fn add(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<i64> {
        let limit = *self.adds_before_failure.lock();
        if let Some(limit) = limit {
            if self.adds.fetch_add(1, Ordering::SeqCst) >= limit {
                return Err(Self::unavailable());
            }
        }
        self.inner.add(record, reindex).await
    }

    async fn remove(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<bool> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.remove(record, reindex).await
    }

    async fn clear(&self, list: &ListRef) -> ProviderResult<()> {
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.clear(list).await
    }

    async fn get_items(&self, list: &ListRef) -> ProviderResult<Vec<ItemRecord>> {
        self.inner.get_items(list).await
    }
}

#[async_trait]
impl RegistryProvider for FlakyProvider {
    async fn get_lists(&self) -> ProviderResult<Vec<ListRecord>> {
        self.inner.get_lists().await
    }

    async fn add_list(&self, record: &ListRecord) -> ProviderResult<i64> {
        self.inner.add_list(record).await
    }

    async fn remove_list(&self, key: &str) -> ProviderResult<()> {
        if self.fail_remove_list.load(Ordering::SeqCst) {
            return Err(Self::unavailable());
        }
        self.inner.remove_list(key).await
    }
}

/// Memory provider whose adds wait until the gate is opened
pub struct GatedProvider {
    inner: MemoryProvider,
    gate: Semaphore,
    /// Signalled when an add reaches the gate
    pub entered: Notify,
}

impl GatedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryProvider::new(),
            gate: Semaphore::new(0),
            entered: Notify::new(),
        })
    }

    /// Let one waiting add through
    pub fn release_one(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl ItemProvider for GatedProvider {
    fn name(&self) -> &str {
        "Gated Provider"
    }

    async fn add(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<i64> {
        self.entered.notify_one();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ProviderError::Other(e.to_string()))?;
        permit.forget();
        self.inner.add(record, reindex).await
    }

    async fn remove(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<bool> {
        self.inner.remove(record, reindex).await
    }

    async fn clear(&self, list: &ListRef) -> ProviderResult<()> {
        self.inner.clear(list).await
    }

    async fn get_items(&self, list: &ListRef) -> ProviderResult<Vec<ItemRecord>> {
        self.inner.get_items(list).await
    }
}

/// Store a list record directly, bypassing any registry
pub async fn seed_list(provider: &dyn RegistryProvider, key: &str, kind: &str) -> i64 {
    let mut record = ListRecord::new(key, ListKind::Queue);
    record.kind = kind.to_string();
    provider.add_list(&record).await.unwrap()
}
