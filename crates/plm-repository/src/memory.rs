//! In-memory provider
//!
//! Simple memory-based storage for testing and development. Data is lost
//! when the process exits.

use async_trait::async_trait;
use plm_core::{ItemRecord, ListRecord, ListRef, OrderUpdate, ProviderResult};
use tokio::sync::RwLock;

use crate::store::Store;
use crate::traits::{ItemProvider, RegistryProvider};

/// In-memory item and registry provider
pub struct MemoryProvider {
    store: RwLock<Store>,
}

impl MemoryProvider {
    /// Create a new, empty memory provider
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }
}

impl Default for MemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemProvider for MemoryProvider {
    fn name(&self) -> &str {
        "Memory Provider"
    }

    async fn add(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<i64> {
        self.store.write().await.add_item(record, reindex)
    }

    async fn remove(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<bool> {
        Ok(self.store.write().await.remove_item(record, reindex))
    }

    async fn clear(&self, list: &ListRef) -> ProviderResult<()> {
        self.store.write().await.clear_items(list);
        Ok(())
    }

    async fn get_items(&self, list: &ListRef) -> ProviderResult<Vec<ItemRecord>> {
        Ok(self.store.read().await.items(list))
    }
}

#[async_trait]
impl RegistryProvider for MemoryProvider {
    async fn get_lists(&self) -> ProviderResult<Vec<ListRecord>> {
        Ok(self.store.read().await.lists())
    }

    async fn add_list(&self, record: &ListRecord) -> ProviderResult<i64> {
        self.store.write().await.add_list(record)
    }

    async fn remove_list(&self, key: &str) -> ProviderResult<()> {
        self.store.write().await.remove_list(key);
        Ok(())
    }
}
