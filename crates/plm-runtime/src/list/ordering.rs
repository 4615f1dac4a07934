//! Ordering strategies
//!
//! A list keeps its cache in *storage order*: the order in which records are
//! persisted, where the item at slot `n` is stored with primary order
//! `compute_order(n)`. Strategies decide where new items land, which item is
//! next, and how storage order maps onto the index callers see.

use plm_core::{Item, ListKind};
use std::cmp::Reverse;

/// Hooks that distinguish one list kind from another
///
/// Slots are positions in storage order; indices are positions in the view
/// returned by [`iteration_order`](OrderingStrategy::iteration_order).
pub trait OrderingStrategy: Default + Send + Sync + 'static {
    /// Kind recorded for lists using this strategy
    const KIND: ListKind;

    /// Arrange items loaded from the provider into storage order
    ///
    /// Providers return items ascending by primary order.
    fn initialize_cache(&self, items: Vec<Item>) -> Vec<Item> {
        items
    }

    /// Slot for an item appended with `add`
    fn add_at(&self, items: &[Item], item: &Item) -> usize;

    /// Slot for an item inserted at view `index`, already clamped to the
    /// list size
    fn insert_at(&self, items: &[Item], item: &Item, index: usize) -> usize;

    /// Slot of the next item, `None` when empty
    fn peek_next(&self, items: &[Item]) -> Option<usize>;

    /// Slot holding view `index`
    fn item_at(&self, items: &[Item], index: usize) -> Option<usize>;

    /// View index of `slot` in a list of `len` items
    fn view_index(&self, len: usize, slot: usize) -> usize;

    /// Primary order persisted for the item at `slot`
    fn compute_order(&self, slot: usize) -> i64;

    /// Secondary and tertiary orders persisted with `item`
    fn secondary_orders(&self, _item: &Item) -> (Option<i64>, Option<i64>) {
        (None, None)
    }

    /// Items in the order callers see them
    fn iteration_order(&self, items: &[Item]) -> Vec<Item> {
        items.to_vec()
    }
}

/// First in, first out
#[derive(Debug, Default, Clone, Copy)]
pub struct QueueOrdering;

impl OrderingStrategy for QueueOrdering {
    const KIND: ListKind = ListKind::Queue;

    fn add_at(&self, items: &[Item], _item: &Item) -> usize {
        items.len()
    }

    fn insert_at(&self, _items: &[Item], _item: &Item, index: usize) -> usize {
        index
    }

    fn peek_next(&self, items: &[Item]) -> Option<usize> {
        if items.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn item_at(&self, items: &[Item], index: usize) -> Option<usize> {
        (index < items.len()).then_some(index)
    }

    fn view_index(&self, _len: usize, slot: usize) -> usize {
        slot
    }

    fn compute_order(&self, slot: usize) -> i64 {
        slot as i64
    }
}

/// Last in, first out
///
/// Storage keeps the oldest item at slot 0 and the top of the stack at the
/// end. Orders are the negated slot, so a push never renumbers existing
/// items and an ascending sort of stored records is top-first. The view is
/// top-first as well: index 0 is always the next item.
#[derive(Debug, Default, Clone, Copy)]
pub struct StackOrdering;

impl OrderingStrategy for StackOrdering {
    const KIND: ListKind = ListKind::Stack;

    fn initialize_cache(&self, mut items: Vec<Item>) -> Vec<Item> {
        items.reverse();
        items
    }

    fn add_at(&self, items: &[Item], _item: &Item) -> usize {
        items.len()
    }

    fn insert_at(&self, items: &[Item], _item: &Item, index: usize) -> usize {
        items.len() - index
    }

    fn peek_next(&self, items: &[Item]) -> Option<usize> {
        items.len().checked_sub(1)
    }

    fn item_at(&self, items: &[Item], index: usize) -> Option<usize> {
        (index < items.len()).then(|| items.len() - 1 - index)
    }

    fn view_index(&self, len: usize, slot: usize) -> usize {
        len - 1 - slot
    }

    fn compute_order(&self, slot: usize) -> i64 {
        -(slot as i64)
    }

    fn iteration_order(&self, items: &[Item]) -> Vec<Item> {
        items.iter().rev().cloned().collect()
    }
}

/// Highest priority first
///
/// Items with equal priority are ordered by their tie-break order, lowest
/// first, with unordered items after ordered ones. Equal ranks keep arrival
/// order. Inserting ignores the requested index and places the item by rank.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityOrdering;

impl PriorityOrdering {
    fn rank(item: &Item) -> (Reverse<i32>, bool, Option<i32>) {
        (Reverse(item.priority()), item.order().is_none(), item.order())
    }

    fn slot_for(items: &[Item], item: &Item) -> usize {
        let rank = Self::rank(item);
        items.partition_point(|existing| Self::rank(existing) <= rank)
    }
}

impl OrderingStrategy for PriorityOrdering {
    const KIND: ListKind = ListKind::Priority;

    fn initialize_cache(&self, mut items: Vec<Item>) -> Vec<Item> {
        items.sort_by_key(Self::rank);
        items
    }

    fn add_at(&self, items: &[Item], item: &Item) -> usize {
        Self::slot_for(items, item)
    }

    fn insert_at(&self, items: &[Item], item: &Item, _index: usize) -> usize {
        Self::slot_for(items, item)
    }

    fn peek_next(&self, items: &[Item]) -> Option<usize> {
        if items.is_empty() {
            None
        } else {
            Some(0)
        }
    }

    fn item_at(&self, items: &[Item], index: usize) -> Option<usize> {
        (index < items.len()).then_some(index)
    }

    fn view_index(&self, _len: usize, slot: usize) -> usize {
        slot
    }

    fn compute_order(&self, slot: usize) -> i64 {
        slot as i64
    }

    fn secondary_orders(&self, item: &Item) -> (Option<i64>, Option<i64>) {
        (Some(i64::from(item.priority())), item.order().map(i64::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(keys: &[&str]) -> Vec<Item> {
        keys.iter().map(|k| Item::new(*k)).collect()
    }

    fn keys(items: &[Item]) -> Vec<&str> {
        items.iter().map(Item::key).collect()
    }

    #[test]
    fn test_queue_appends_and_serves_front() {
        let queue = QueueOrdering;
        let cache = items(&["a", "b", "c"]);

        assert_eq!(queue.add_at(&cache, &Item::new("d")), 3);
        assert_eq!(queue.insert_at(&cache, &Item::new("d"), 1), 1);
        assert_eq!(queue.peek_next(&cache), Some(0));
        assert_eq!(queue.item_at(&cache, 2), Some(2));
        assert_eq!(queue.item_at(&cache, 3), None);
        assert_eq!(queue.compute_order(2), 2);
    }

    #[test]
    fn test_stack_orders_are_negated_slots() {
        let stack = StackOrdering;

        assert_eq!(stack.compute_order(0), 0);
        assert_eq!(stack.compute_order(1), -1);
        assert_eq!(stack.compute_order(2), -2);
    }

    #[test]
    fn test_stack_view_is_top_first() {
        let stack = StackOrdering;
        let cache = items(&["a", "b", "c"]);

        assert_eq!(keys(&stack.iteration_order(&cache)), vec!["c", "b", "a"]);
        assert_eq!(stack.peek_next(&cache), Some(2));
        assert_eq!(stack.item_at(&cache, 0), Some(2));
        assert_eq!(stack.item_at(&cache, 2), Some(0));
        assert_eq!(stack.item_at(&cache, 3), None);
        assert_eq!(stack.view_index(3, 2), 0);
    }

    #[test]
    fn test_stack_insert_maps_view_index_to_slot() {
        let stack = StackOrdering;
        let cache = items(&["a", "b", "c"]);

        // Top of the stack
        assert_eq!(stack.insert_at(&cache, &Item::new("x"), 0), 3);
        // Bottom of the stack
        assert_eq!(stack.insert_at(&cache, &Item::new("x"), 3), 0);
    }

    #[test]
    fn test_stack_restores_storage_from_provider_order() {
        let stack = StackOrdering;

        // Ascending by order 0, -1, -2 yields newest first
        let loaded = stack.initialize_cache(items(&["c", "b", "a"]));
        assert_eq!(keys(&loaded), vec!["a", "b", "c"]);
        assert_eq!(stack.peek_next(&loaded), Some(2));
    }

    #[test]
    fn test_empty_lists_have_no_next() {
        assert_eq!(QueueOrdering.peek_next(&[]), None);
        assert_eq!(StackOrdering.peek_next(&[]), None);
        assert_eq!(PriorityOrdering.peek_next(&[]), None);
    }

    #[test]
    fn test_priority_places_by_rank() {
        let priority = PriorityOrdering;
        let cache = vec![
            Item::new("high").with_priority(5),
            Item::new("mid").with_priority(3),
            Item::new("low").with_priority(1),
        ];

        assert_eq!(priority.add_at(&cache, &Item::new("x").with_priority(4)), 1);
        assert_eq!(priority.add_at(&cache, &Item::new("x").with_priority(9)), 0);
        assert_eq!(priority.add_at(&cache, &Item::new("x").with_priority(0)), 3);
        // Index is ignored
        assert_eq!(
            priority.insert_at(&cache, &Item::new("x").with_priority(0), 0),
            3
        );
    }

    #[test]
    fn test_priority_equal_rank_keeps_arrival_order() {
        let priority = PriorityOrdering;
        let cache = vec![
            Item::new("first").with_priority(2),
            Item::new("second").with_priority(2),
        ];

        assert_eq!(priority.add_at(&cache, &Item::new("third").with_priority(2)), 2);
    }

    #[test]
    fn test_priority_tie_break_order() {
        let priority = PriorityOrdering;
        let cache = vec![
            Item::new("one").with_priority(2).with_order(1),
            Item::new("three").with_priority(2).with_order(3),
            Item::new("unordered").with_priority(2),
        ];

        let two = Item::new("two").with_priority(2).with_order(2);
        assert_eq!(priority.add_at(&cache, &two), 1);

        let later = Item::new("later").with_priority(2);
        assert_eq!(priority.add_at(&cache, &later), 3);
    }

    #[test]
    fn test_priority_secondary_orders() {
        let item = Item::new("a").with_priority(7).with_order(2);
        assert_eq!(PriorityOrdering.secondary_orders(&item), (Some(7), Some(2)));
        assert_eq!(QueueOrdering.secondary_orders(&item), (None, None));
    }

    #[test]
    fn test_priority_initialize_sorts_by_rank() {
        let loaded = PriorityOrdering.initialize_cache(vec![
            Item::new("low").with_priority(1),
            Item::new("high").with_priority(9),
        ]);
        assert_eq!(keys(&loaded), vec!["high", "low"]);
    }
}
