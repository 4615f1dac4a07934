//! Intake queue example
//!
//! This example demonstrates:
//! - Building a ListManager on a JSON file store
//! - Declaring lists in YAML configuration
//! - Serving a queue and a stack, then reloading them from disk

use anyhow::Result;
use plm_sdk::{Item, ListManagerBuilder, ManagerConfig, PersistentList};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CONFIG: &str = r#"
provider:
  source: filesystem
  path: target/demo/lists.json
lists:
  - key: intake
    kind: queue
    description: Walk-in patients
  - key: charts
    kind: stack
    description: Charts waiting for review
"#;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plm_runtime=debug,plm_sdk=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    println!("=== Intake Queue Example ===\n");

    let config = ManagerConfig::from_yaml_str(CONFIG)?;
    let manager = ListManagerBuilder::new()
        .with_config(config.clone())
        .build()
        .await?;
    manager.start().await?;

    let intake = manager
        .list("intake")?
        .ok_or_else(|| anyhow::anyhow!("intake list missing"))?;
    let charts = manager
        .list("charts")?
        .ok_or_else(|| anyhow::anyhow!("charts list missing"))?;

    intake.clear().await?;
    charts.clear().await?;

    intake
        .add(vec![
            Item::new("patient-1001").with_creator("front-desk"),
            Item::new("patient-1002").with_creator("front-desk"),
            Item::new("patient-1003").with_creator("front-desk"),
        ])
        .await?;
    charts
        .add(vec![Item::new("chart-a"), Item::new("chart-b")])
        .await?;

    if let Some(next) = intake.get_next_and_remove().await? {
        println!("Seeing {} (added by {:?})", next.key(), next.creator());
    }
    manager.stop().await?;

    // A second manager on the same file picks up where the first stopped
    let manager = ListManagerBuilder::new().with_config(config).build().await?;
    manager.start().await?;

    for list in manager.registry().get_lists()? {
        let keys: Vec<String> = list
            .get_items()
            .await
            .iter()
            .map(|item| item.key().to_string())
            .collect();
        println!("{} ({}): {:?}", list.key(), list.kind(), keys);
    }

    manager.stop().await?;
    Ok(())
}
