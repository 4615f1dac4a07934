//! Provider configuration
//!
//! Selects which storage provider backs the lists and the registry.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::file_system::FileProvider;
use crate::memory::MemoryProvider;
use crate::traits::{ItemProvider, RegistryProvider};
use plm_core::{ProviderError, ProviderResult};

/// Provider source type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSource {
    /// JSON document on the local file system
    #[default]
    FileSystem,
    /// Process memory (for testing)
    Memory,
}

/// Provider configuration
///
/// # Examples
///
/// ```rust
/// use plm_repository::ProviderConfig;
///
/// let config = ProviderConfig::file_system("data/lists.json");
/// assert!(config.validate().is_ok());
///
/// let config = ProviderConfig::memory();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Configuration source type
    #[serde(default)]
    pub source: ProviderSource,

    /// Path of the store document (required for FileSystem source)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ProviderConfig {
    /// Create a file system provider configuration
    pub fn file_system(path: impl Into<String>) -> Self {
        Self {
            source: ProviderSource::FileSystem,
            path: Some(path.into()),
        }
    }

    /// Create a memory provider configuration
    pub fn memory() -> Self {
        Self {
            source: ProviderSource::Memory,
            path: None,
        }
    }

    /// Validate the configuration
    ///
    /// Returns an error if required fields are missing for the selected source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.source {
            ProviderSource::FileSystem => {
                if self.path.as_deref().map_or(true, |p| p.trim().is_empty()) {
                    return Err(ConfigError::MissingField {
                        backend: "FileSystem".to_string(),
                        field: "path".to_string(),
                    });
                }
            }
            ProviderSource::Memory => {}
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required field is missing for the selected source
    #[error("{backend} source requires {field} to be set")]
    MissingField { backend: String, field: String },
}

/// The pair of providers a manager runs on
///
/// Both handles usually point at the same provider instance.
#[derive(Clone)]
pub struct Providers {
    pub items: Arc<dyn ItemProvider>,
    pub registry: Arc<dyn RegistryProvider>,
}

impl Providers {
    /// Wrap a single provider that implements both traits
    pub fn shared<P>(provider: Arc<P>) -> Self
    where
        P: ItemProvider + RegistryProvider + 'static,
    {
        Self {
            items: provider.clone(),
            registry: provider,
        }
    }

    /// Open the providers described by `config`
    pub async fn connect(config: &ProviderConfig) -> ProviderResult<Self> {
        match config.source {
            ProviderSource::Memory => {
                info!("Using in-memory list store");
                Ok(Self::shared(Arc::new(MemoryProvider::new())))
            }
            ProviderSource::FileSystem => {
                let path = config.path.as_deref().ok_or_else(|| {
                    ProviderError::Unavailable("FileSystem source requires path to be set".into())
                })?;
                let provider = FileProvider::open(path).await?;
                info!("Using list store at {}", path);
                Ok(Self::shared(Arc::new(provider)))
            }
        }
    }
}
