//! List events example
//!
//! Subscribes to registry and list events on an in-memory manager and
//! prints each one as it is delivered.

use anyhow::Result;
use plm_sdk::{
    Item, ListEvent, ListEventListener, ListKind, ListManagerBuilder, PersistentList,
    RegistryEvent, RegistryEventListener,
};
use std::sync::Arc;

struct Printer;

impl ListEventListener for Printer {
    fn item_added(&self, event: &ListEvent) -> anyhow::Result<()> {
        if let Some(item) = event.item() {
            println!(
                "  [{}] added {} at {:?}",
                event.source().key,
                item.key(),
                event.index()
            );
        }
        Ok(())
    }

    fn item_removed(&self, event: &ListEvent) -> anyhow::Result<()> {
        if let Some(item) = event.item() {
            println!("  [{}] removed {}", event.source().key, item.key());
        }
        Ok(())
    }

    fn list_cleared(&self, event: &ListEvent) -> anyhow::Result<()> {
        println!("  [{}] cleared", event.source().key);
        Ok(())
    }
}

impl RegistryEventListener for Printer {
    fn list_added(&self, event: &RegistryEvent) -> anyhow::Result<()> {
        println!("  [{}] created list {}", event.source(), event.list().key());
        Ok(())
    }

    fn list_removed(&self, event: &RegistryEvent) -> anyhow::Result<()> {
        println!("  [{}] removed list {}", event.source(), event.list().key());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plm_runtime=info,plm_sdk=info".into()),
        )
        .init();

    println!("=== List Events Example ===\n");

    let manager = ListManagerBuilder::new().build().await?;
    manager.start().await?;

    let printer = Arc::new(Printer);
    manager.registry().add_event_listener(printer.clone());

    let triage = manager
        .registry()
        .ensure_list(ListKind::Priority, "triage", None)
        .await?;
    triage.add_event_listener(printer.clone());

    triage
        .add(vec![
            Item::new("sprain").with_priority(1),
            Item::new("chest-pain").with_priority(9),
            Item::new("fever").with_priority(4),
        ])
        .await?;

    while let Some(item) = triage.get_next_and_remove().await? {
        println!("Treating {} (priority {})", item.key(), item.priority());
    }

    triage.clear().await?;
    manager.registry().remove_list("triage").await?;
    manager.stop().await?;
    Ok(())
}
