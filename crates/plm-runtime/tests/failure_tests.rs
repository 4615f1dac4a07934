//! Provider failures and listener failures

mod common;

use common::{items, keys, open_list, FailingListener, FlakyProvider, RecordingListener};
use plm_core::{Item, ListError, ListOperation, ProviderError};
use plm_runtime::{PersistentList, QueueOrdering, StackOrdering};
use std::sync::atomic::Ordering;
use std::sync::Arc;

#[tokio::test]
async fn test_failed_add_rolls_back_item() {
    let provider = FlakyProvider::new();
    let list = open_list::<QueueOrdering>(provider.clone()).await;
    let listener = RecordingListener::new();
    list.add_event_listener(listener.clone());

    provider.fail_adds_after(0);
    let err = list.add(items(&["a"])).await.unwrap_err();

    assert!(err.is_storage());
    assert!(matches!(
        err,
        ListError::Storage(ProviderError::Unavailable(_))
    ));
    assert_eq!(list.size(), 0);
    assert!(list.get_items().await.is_empty());
    assert!(listener.events().is_empty());

    // The key is free again once storage recovers
    provider.heal();
    list.add(items(&["a"])).await.unwrap();
    assert_eq!(list.size(), 1);
}

#[tokio::test]
async fn test_partial_batch_keeps_committed_prefix() {
    let provider = FlakyProvider::new();
    let list = open_list::<QueueOrdering>(provider.clone()).await;
    let listener = RecordingListener::new();
    list.add_event_listener(listener.clone());

    provider.fail_adds_after(1);
    let err = list.add(items(&["a", "b", "c"])).await.unwrap_err();

    assert!(err.is_storage());
    assert_eq!(keys(&list.get_items().await), vec!["a"]);
    // Nothing is announced unless the whole batch succeeds
    assert!(listener.keys(ListOperation::Added).is_empty());
    assert!(listener.events().is_empty());

    // What is cached matches what is stored
    provider.heal();
    let reopened = open_list::<QueueOrdering>(provider.clone()).await;
    assert_eq!(keys(&reopened.get_items().await), vec!["a"]);
}

#[tokio::test]
async fn test_failed_insert_restores_order() {
    let provider = FlakyProvider::new();
    let list = open_list::<QueueOrdering>(provider.clone()).await;
    list.add(items(&["a", "b"])).await.unwrap();

    provider.fail_adds_after(0);
    let err = list.insert(0, Item::new("x")).await.unwrap_err();

    assert!(err.is_storage());
    assert_eq!(keys(&list.get_items().await), vec!["a", "b"]);
}

#[tokio::test]
async fn test_failed_remove_restores_item() {
    let provider = FlakyProvider::new();
    let list = open_list::<StackOrdering>(provider.clone()).await;
    let listener = RecordingListener::new();
    list.add(items(&["a", "b", "c"])).await.unwrap();
    list.add_event_listener(listener.clone());

    provider.fail_remove.store(true, Ordering::SeqCst);

    assert!(list.remove(&Item::new("b")).await.unwrap_err().is_storage());
    assert!(list.get_next_and_remove().await.unwrap_err().is_storage());

    assert_eq!(keys(&list.get_items().await), vec!["c", "b", "a"]);
    assert_eq!(list.size(), 3);
    assert_eq!(listener.count(ListOperation::Removed), 0);
}

#[tokio::test]
async fn test_failed_clear_keeps_items() {
    let provider = FlakyProvider::new();
    let list = open_list::<QueueOrdering>(provider.clone()).await;
    let listener = RecordingListener::new();
    list.add(items(&["a"])).await.unwrap();
    list.add_event_listener(listener.clone());

    provider.fail_clear.store(true, Ordering::SeqCst);

    assert!(list.clear().await.unwrap_err().is_storage());
    assert_eq!(list.size(), 1);
    assert_eq!(listener.count(ListOperation::Cleared), 0);
}

#[tokio::test]
async fn test_listener_failure_does_not_fail_mutation() {
    let provider = FlakyProvider::new();
    let list = open_list::<QueueOrdering>(provider.clone()).await;
    let recorder = RecordingListener::new();
    list.add_event_listener(Arc::new(FailingListener));
    list.add_event_listener(recorder.clone());

    list.add(items(&["a", "b"])).await.unwrap();

    // Later listeners still get every event
    assert_eq!(recorder.keys(ListOperation::Added), vec!["a", "b"]);
    assert_eq!(list.size(), 2);
}
