//! Persisted shapes exchanged with storage providers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::Item;
use crate::kind::ListKind;

/// Identifies a list to a storage provider
///
/// Providers match on `key`; `id` is informational and may be `None` for
/// lists that were never stored through a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListRef {
    pub id: Option<i64>,
    pub key: String,
}

impl ListRef {
    pub fn new(id: Option<i64>, key: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
        }
    }
}

/// Stored form of an item
///
/// Providers return records sorted ascending by
/// (`primary_order`, `secondary_order`, `tertiary_order`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub list_id: Option<i64>,
    pub list_key: String,
    pub item_id: Option<i64>,
    pub key: String,
    /// Position-derived order assigned by the list's ordering strategy
    pub primary_order: i64,
    /// Priority, for priority lists
    #[serde(default)]
    pub secondary_order: Option<i64>,
    /// Tie-break order, for priority lists
    #[serde(default)]
    pub tertiary_order: Option<i64>,
    pub creator: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl ItemRecord {
    /// Build the record for `item` stored at `primary_order` in `list`
    pub fn new(list: &ListRef, item: &Item, primary_order: i64) -> Self {
        Self {
            list_id: list.id,
            list_key: list.key.clone(),
            item_id: item.id(),
            key: item.key().to_string(),
            primary_order,
            secondary_order: None,
            tertiary_order: None,
            creator: item.creator().map(str::to_string),
            created_on: item.created_on(),
        }
    }

    /// Attach the secondary and tertiary orders
    pub fn with_secondary_orders(mut self, secondary: Option<i64>, tertiary: Option<i64>) -> Self {
        self.secondary_order = secondary;
        self.tertiary_order = tertiary;
        self
    }

    /// Sort key providers use when returning records
    pub fn sort_key(&self) -> (i64, Option<i64>, Option<i64>) {
        (self.primary_order, self.secondary_order, self.tertiary_order)
    }
}

/// A new primary order for an already stored item
///
/// Lists send these alongside an add or remove so the provider can renumber
/// displaced items in the same atomic call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub key: String,
    pub primary_order: i64,
}

impl OrderUpdate {
    pub fn new(key: impl Into<String>, primary_order: i64) -> Self {
        Self {
            key: key.into(),
            primary_order,
        }
    }
}

/// Stored list metadata
///
/// `kind` is kept as the raw persisted name so that records written by a
/// build with other kinds still load; the registry skips what it cannot
/// resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRecord {
    pub id: Option<i64>,
    pub key: String,
    pub kind: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl ListRecord {
    /// Create an unpersisted record for a new list
    pub fn new(key: impl Into<String>, kind: ListKind) -> Self {
        Self {
            id: None,
            key: key.into(),
            kind: kind.as_str().to_string(),
            description: None,
            created_on: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Reference used for item provider calls
    pub fn list_ref(&self) -> ListRef {
        ListRef::new(self.id, self.key.clone())
    }
}
