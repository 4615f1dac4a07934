//! Provider trait definitions
//!
//! - [`ItemProvider`]: per-list write-through storage of items
//! - [`RegistryProvider`]: storage of list metadata
//!
//! Each call must be atomic on its own: an `add` either stores the item and
//! applies every accompanying [`OrderUpdate`], or changes nothing. The list
//! manager does not coordinate transactions across calls.

use async_trait::async_trait;
use plm_core::{ItemRecord, ListRecord, ListRef, OrderUpdate, ProviderResult};

/// Durable storage for list items
///
/// Implementations must be `Send + Sync`; a single provider is usually
/// shared by every list in a registry, and records are keyed by
/// [`ItemRecord::list_key`].
#[async_trait]
pub trait ItemProvider: Send + Sync {
    /// Name of the provider, for diagnostics
    fn name(&self) -> &str;

    /// Store one item at its `primary_order`
    ///
    /// `reindex` carries the new primary order of every stored item displaced
    /// by this insertion; it must be applied in the same atomic step.
    ///
    /// # Returns
    /// The durable id assigned to the item
    async fn add(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<i64>;

    /// Delete one item, renumbering the remaining items per `reindex`
    ///
    /// # Returns
    /// `true` if a stored item was deleted
    async fn remove(&self, record: &ItemRecord, reindex: &[OrderUpdate]) -> ProviderResult<bool>;

    /// Delete all items belonging to `list`
    async fn clear(&self, list: &ListRef) -> ProviderResult<()>;

    /// All items of `list`, sorted by primary, secondary then tertiary order
    async fn get_items(&self, list: &ListRef) -> ProviderResult<Vec<ItemRecord>>;
}

/// Durable storage for list metadata
#[async_trait]
pub trait RegistryProvider: Send + Sync {
    /// All stored list records
    async fn get_lists(&self) -> ProviderResult<Vec<ListRecord>>;

    /// Store a new list record
    ///
    /// # Returns
    /// The durable id assigned to the list
    async fn add_list(&self, record: &ListRecord) -> ProviderResult<i64>;

    /// Delete the list with `key` together with its items
    async fn remove_list(&self, key: &str) -> ProviderResult<()>;
}
