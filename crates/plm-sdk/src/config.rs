//! Manager configuration
//!
//! ```yaml
//! provider:
//!   source: filesystem
//!   path: data/lists.json
//! kinds: [queue, stack]
//! lists:
//!   - key: intake
//!     kind: queue
//!     description: Walk-in patients
//! ```

use plm_core::{validate_key, ListKind};
use plm_repository::ProviderConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, SdkError};

/// A list that must exist once the manager has started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDefinition {
    pub key: String,
    pub kind: ListKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ListDefinition {
    pub fn new(kind: ListKind, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Main manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Where lists and items are stored
    pub provider: ProviderConfig,

    /// List kinds the registry may construct
    #[serde(default = "default_kinds")]
    pub kinds: Vec<ListKind>,

    /// Lists ensured on start
    #[serde(default)]
    pub lists: Vec<ListDefinition>,
}

fn default_kinds() -> Vec<ListKind> {
    ListKind::ALL.to_vec()
}

impl ManagerConfig {
    /// Create a configuration for `provider` with every kind enabled
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            kinds: default_kinds(),
            lists: Vec::new(),
        }
    }

    /// Parse a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Restrict the registry to `kinds`
    pub fn with_kinds(mut self, kinds: Vec<ListKind>) -> Self {
        self.kinds = kinds;
        self
    }

    /// Add a list to ensure on start
    pub fn with_list(mut self, list: ListDefinition) -> Self {
        self.lists.push(list);
        self
    }

    /// Check the provider settings and the declared lists
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        if self.kinds.is_empty() {
            return Err(SdkError::Config(
                "At least one list kind must be enabled".to_string(),
            ));
        }

        let mut keys = HashSet::new();
        for list in &self.lists {
            validate_key(&list.key, "list")
                .map_err(|e| SdkError::Config(format!("List '{}': {}", list.key, e)))?;

            if !self.kinds.contains(&list.kind) {
                return Err(SdkError::Config(format!(
                    "List '{}' uses kind '{}', which is not enabled",
                    list.key, list.kind
                )));
            }

            if !keys.insert(list.key.as_str()) {
                return Err(SdkError::Config(format!(
                    "List '{}' is declared more than once",
                    list.key
                )));
            }
        }

        Ok(())
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self::new(ProviderConfig::memory())
    }
}
