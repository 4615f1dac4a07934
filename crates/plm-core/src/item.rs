//! List item value type

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::ItemRecord;

/// The unit of storage in a list
///
/// An item is identified within its list by `key`. The `creator` is an opaque
/// reference that the list manager never interprets. `id` stays `None` until
/// a provider has persisted the item.
///
/// `priority` and `order` are only consulted by priority lists; queues and
/// stacks carry them through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    key: String,
    creator: Option<String>,
    created_on: DateTime<Utc>,
    id: Option<i64>,
    #[serde(default)]
    priority: i32,
    #[serde(default)]
    order: Option<i32>,
}

impl Item {
    /// Create a new item stamped with the current time
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            creator: None,
            created_on: Utc::now(),
            id: None,
            priority: 0,
            order: None,
        }
    }

    /// Set the creator reference
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Override the creation timestamp
    pub fn created_at(mut self, created_on: DateTime<Utc>) -> Self {
        self.created_on = created_on;
        self
    }

    /// Set the priority used by priority lists (higher is served first)
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the tie-break order used by priority lists (lower is served first)
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref()
    }

    pub fn created_on(&self) -> DateTime<Utc> {
        self.created_on
    }

    /// Durable id, assigned once a provider has stored the item
    pub fn id(&self) -> Option<i64> {
        self.id
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn order(&self) -> Option<i32> {
        self.order
    }

    /// Record the id a provider assigned to this item
    pub fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let mut item = Item::new(record.key)
            .created_at(record.created_on)
            .with_priority(
                record
                    .secondary_order
                    .and_then(|p| i32::try_from(p).ok())
                    .unwrap_or_default(),
            );
        item.creator = record.creator;
        item.order = record.tertiary_order.and_then(|o| i32::try_from(o).ok());
        item.set_id(record.item_id);
        item
    }
}
