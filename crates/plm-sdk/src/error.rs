//! SDK error types

use plm_core::{ListError, ProviderError};
use plm_repository::ConfigError;
use thiserror::Error;

/// SDK error type
#[derive(Error, Debug)]
pub enum SdkError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration document could not be parsed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// List or registry error
    #[error("List error: {0}")]
    List(#[from] ListError),

    /// Storage provider could not be opened
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

impl From<ConfigError> for SdkError {
    fn from(error: ConfigError) -> Self {
        SdkError::Config(error.to_string())
    }
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;
