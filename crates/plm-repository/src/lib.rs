//! Storage providers for the persistent list manager
//!
//! Lists cache their items in memory and write every change through to an
//! [`ItemProvider`]; the registry stores list metadata through a
//! [`RegistryProvider`]. This crate defines both traits and ships two
//! implementations:
//!
//! - [`MemoryProvider`]: process-local storage, for tests and development
//! - [`FileProvider`]: a single JSON document on disk, rewritten atomically
//!   after every call
//!
//! # Example
//!
//! ```no_run
//! use plm_repository::{ProviderConfig, Providers, RegistryProvider};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ProviderConfig::file_system("data/lists.json");
//! config.validate()?;
//!
//! let providers = Providers::connect(&config).await?;
//! let lists = providers.registry.get_lists().await?;
//! println!("{} lists stored", lists.len());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod file_system;
pub mod memory;
mod store;
pub mod traits;

pub use config::{ConfigError, ProviderConfig, ProviderSource, Providers};
pub use file_system::FileProvider;
pub use memory::MemoryProvider;
pub use traits::{ItemProvider, RegistryProvider};
