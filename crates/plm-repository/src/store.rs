//! Storage state shared by the memory and file providers

use plm_core::{ItemRecord, ListRecord, ListRef, OrderUpdate, ProviderError, ProviderResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything a provider stores, keyed by list key
///
/// Every mutating method checks its preconditions before touching state, so
/// an `Err` always leaves the store unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Store {
    #[serde(default)]
    next_list_id: i64,
    #[serde(default)]
    next_item_id: i64,
    #[serde(default)]
    lists: BTreeMap<String, ListRecord>,
    #[serde(default)]
    items: BTreeMap<String, Vec<ItemRecord>>,
}

impl Store {
    pub(crate) fn add_item(
        &mut self,
        record: &ItemRecord,
        reindex: &[OrderUpdate],
    ) -> ProviderResult<i64> {
        let entries = self.items.entry(record.list_key.clone()).or_default();
        if entries.iter().any(|e| e.key == record.key) {
            return Err(ProviderError::Conflict(format!(
                "Item '{}' is already stored in list '{}'",
                record.key, record.list_key
            )));
        }

        apply_reindex(entries, reindex);

        self.next_item_id += 1;
        let mut stored = record.clone();
        stored.item_id = Some(self.next_item_id);
        entries.push(stored);

        Ok(self.next_item_id)
    }

    pub(crate) fn remove_item(&mut self, record: &ItemRecord, reindex: &[OrderUpdate]) -> bool {
        let Some(entries) = self.items.get_mut(&record.list_key) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|e| e.key != record.key);
        apply_reindex(entries, reindex);

        entries.len() != before
    }

    pub(crate) fn clear_items(&mut self, list: &ListRef) {
        self.items.remove(&list.key);
    }

    pub(crate) fn items(&self, list: &ListRef) -> Vec<ItemRecord> {
        let mut records = self.items.get(&list.key).cloned().unwrap_or_default();
        records.sort_by_key(ItemRecord::sort_key);
        records
    }

    pub(crate) fn add_list(&mut self, record: &ListRecord) -> ProviderResult<i64> {
        if self.lists.contains_key(&record.key) {
            return Err(ProviderError::Conflict(format!(
                "List '{}' is already stored",
                record.key
            )));
        }

        self.next_list_id += 1;
        let mut stored = record.clone();
        stored.id = Some(self.next_list_id);
        self.lists.insert(record.key.clone(), stored);

        Ok(self.next_list_id)
    }

    /// Returns whether a list record existed
    pub(crate) fn remove_list(&mut self, key: &str) -> bool {
        self.items.remove(key);
        self.lists.remove(key).is_some()
    }

    pub(crate) fn lists(&self) -> Vec<ListRecord> {
        self.lists.values().cloned().collect()
    }
}

fn apply_reindex(entries: &mut [ItemRecord], reindex: &[OrderUpdate]) {
    for update in reindex {
        if let Some(entry) = entries.iter_mut().find(|e| e.key == update.key) {
            entry.primary_order = update.primary_order;
        }
    }
}
