//! Builder pattern for ListManager

use plm_core::ListKind;
use plm_repository::{ProviderConfig, Providers};
use plm_runtime::{ListFactory, ListRegistry};
use std::sync::Arc;
use tracing::debug;

use crate::config::{ListDefinition, ManagerConfig};
use crate::error::Result;
use crate::manager::ListManager;

/// Builder for ListManager
///
/// # Example
///
/// ```rust,no_run
/// use plm_sdk::{ListKind, ListManagerBuilder, ProviderConfig};
///
/// # #[tokio::main]
/// # async fn main() -> plm_sdk::Result<()> {
/// let manager = ListManagerBuilder::new()
///     .with_provider(ProviderConfig::file_system("data/lists.json"))
///     .add_list(ListKind::Queue, "intake", Some("Walk-in patients"))
///     .build()
///     .await?;
///
/// manager.start().await?;
/// # Ok(())
/// # }
/// ```
pub struct ListManagerBuilder {
    config: ManagerConfig,
    providers: Option<Providers>,
    factory: Option<ListFactory>,
}

impl ListManagerBuilder {
    /// Create a new builder backed by the memory provider
    pub fn new() -> Self {
        Self {
            config: ManagerConfig::default(),
            providers: None,
            factory: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: ManagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set where lists are stored
    pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
        self.config.provider = provider;
        self
    }

    /// Use already opened providers instead of the configured source
    pub fn with_providers(mut self, providers: Providers) -> Self {
        self.providers = Some(providers);
        self
    }

    /// Use a custom factory instead of one built from the configured kinds
    pub fn with_factory(mut self, factory: ListFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Declare a list to ensure on start
    pub fn add_list(mut self, kind: ListKind, key: &str, description: Option<&str>) -> Self {
        self.config.lists.push(ListDefinition {
            key: key.to_string(),
            kind,
            description: description.map(str::to_string),
        });
        self
    }

    /// Build the list manager
    ///
    /// Validates the configuration and opens the providers. The registry is
    /// not loaded until [`ListManager::start`].
    pub async fn build(self) -> Result<ListManager> {
        self.config.validate()?;

        let providers = match self.providers {
            Some(providers) => providers,
            None => Providers::connect(&self.config.provider).await?,
        };

        let factory = self
            .factory
            .unwrap_or_else(|| ListFactory::with_kinds(&self.config.kinds));
        debug!("List factory supports {:?}", factory.kinds());

        let registry = ListRegistry::with_factory(&providers, factory);
        Ok(ListManager::new(Arc::new(registry), self.config.lists))
    }
}

impl Default for ListManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
