//! Persistent list manager SDK
//!
//! High-level API for hosting the list registry: configuration, provider
//! setup, and the start/stop lifecycle.

pub mod builder;
pub mod config;
pub mod error;
pub mod manager;

// Re-export main types
pub use builder::ListManagerBuilder;
pub use config::{ListDefinition, ManagerConfig};
pub use error::{Result, SdkError};
pub use manager::ListManager;

// Re-export commonly used types from dependencies
pub use plm_core::{Item, ListError, ListEvent, ListEventListener, ListKind, ListOperation};
pub use plm_repository::{ProviderConfig, ProviderSource, Providers};
pub use plm_runtime::{
    ListHandle, ListRegistry, PersistentList, RegistryEvent, RegistryEventListener,
    RegistryOperation,
};
