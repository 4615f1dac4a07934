//! File system provider
//!
//! Keeps the whole store in memory and rewrites a single JSON document after
//! every mutating call. The document is written to a sibling temp file and
//! renamed into place, so a crash never leaves a half-written file behind.

use async_trait::async_trait;
use plm_core::{ItemRecord, ListRecord, ListRef, OrderUpdate, ProviderResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::store::Store;
use crate::traits::{ItemProvider, RegistryProvider};

/// JSON-file backed item and registry provider
pub struct FileProvider {
    path: PathBuf,
    store: Mutex<Store>,
}

impl FileProvider {
    /// Open the provider at `path`
    ///
    /// A missing file starts an empty store; the file is created on the
    /// first write.
    pub async fn open(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref().to_path_buf();

        let store = if fs::try_exists(&path).await? {
            let content = fs::read(&path).await?;
            let store: Store = serde_json::from_slice(&content)?;
            debug!("Loaded list store from {}", path.display());
            store
        } else {
            debug!("No list store at {}, starting empty", path.display());
            Store::default()
        };

        Ok(Self {
            path,
            store: Mutex::new(store),
        })
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `op` and persist the result, reverting the in-memory store if
    /// persisting fails
    async fn write<T, F>(&self, op: F) -> ProviderResult<T>
    where
        F: FnOnce(&mut Store) -> ProviderResult<T>,
    {
        let mut store = self.store.lock().await;
        let backup = store.clone();

        let result = op(&mut store)?;

        if let Err(e) = self.persist(&store).await {
            *store = backup;
            return Err(e);
        }

        Ok(result)
    }

    async fn persist(&self, store: &Store) -> ProviderResult<()> {
        let content = serde_json::to_vec_pretty(store)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, &content).await?;
        fs::rename(&tmp, &self.path).await?;

        debug!("Persisted list store to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ItemProvider for FileProvider {
    fn name(&self) -> &str {
        "File System Provider"
    }

    async fn add(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<i64> {
        self.write(|store| store.add_item(record, reindex)).await
    }

    async fn remove(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<bool> {
        self.write(|store| Ok(store.remove_item(record, reindex)))
            .await
    }

    async fn clear(&self, list: &ListRef) -> ProviderResult<()> {
        self.write(|store| {
            store.clear_items(list);
            Ok(())
        })
        .await
    }

    async fn get_items(&self, list: &ListRef) -> ProviderResult<Vec<ItemRecord>> {
        Ok(self.store.lock().await.items(list))
    }
}

#[async_trait]
impl RegistryProvider for FileProvider {
    async fn get_lists(&self) -> ProviderResult<Vec<ListRecord>> {
        Ok(self.store.lock().await.lists())
    }

    async fn add_list(&self, record: &ListRecord) -> ProviderResult<i64> {
        self.write(|store| store.add_list(record)).await
    }

    async fn remove_list(&self, key: &str) -> ProviderResult<()> {
        self.write(|store| {
            store.remove_list(key);
            Ok(())
        })
        .await
    }
}
