//! Host lifecycle around the list registry

use plm_runtime::{ListHandle, ListRegistry};
use std::sync::Arc;
use tracing::info;

use crate::config::ListDefinition;
use crate::error::Result;

/// Owns the registry and the lists declared in configuration
pub struct ListManager {
    registry: Arc<ListRegistry>,
    declared: Vec<ListDefinition>,
}

impl ListManager {
    pub(crate) fn new(registry: Arc<ListRegistry>, declared: Vec<ListDefinition>) -> Self {
        Self { registry, declared }
    }

    /// Load the registry and ensure every declared list exists
    ///
    /// Safe to call more than once.
    pub async fn start(&self) -> Result<()> {
        info!("Starting list manager");
        self.registry.load().await?;

        for list in &self.declared {
            self.registry
                .ensure_list(list.kind, &list.key, list.description.clone())
                .await?;
        }

        info!(
            "List manager started with {} lists",
            self.registry.get_lists()?.len()
        );
        Ok(())
    }

    /// Stop the manager. Every change is already stored, so nothing is
    /// flushed.
    pub async fn stop(&self) -> Result<()> {
        info!("Stopping list manager");
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.registry.is_loaded()
    }

    pub fn registry(&self) -> &Arc<ListRegistry> {
        &self.registry
    }

    /// Look up a list by key
    pub fn list(&self, key: &str) -> Result<Option<ListHandle>> {
        Ok(self.registry.get_list(key)?)
    }

    /// Lists declared in configuration
    pub fn declared_lists(&self) -> &[ListDefinition] {
        &self.declared
    }
}
