//! Error types shared by lists, registries and storage providers

use thiserror::Error;

/// Result type alias for list and registry operations
pub type ListResult<T> = Result<T, ListError>;

/// Result type alias for storage provider calls
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised by a storage provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The write conflicts with what is already stored
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend cannot be reached
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Generic error
    #[error("Provider error: {0}")]
    Other(String),
}

/// Errors that can occur during list and registry operations
///
/// Validation, duplicate and state errors are raised before anything is
/// mutated. [`ListError::Storage`] means a provider call failed after the
/// attempted cache change was rolled back, so a retry may succeed.
#[derive(Error, Debug)]
pub enum ListError {
    /// Malformed input (empty or oversized key, unsupported list kind)
    #[error("Invalid argument: {0}")]
    Validation(String),

    /// An item with the same key already exists in the list
    #[error("An item with the key '{key}' has already been added to the '{list}' list.")]
    DuplicateItem { list: String, key: String },

    /// A list with the same key already exists in the registry
    #[error("A list with the key '{key}' has already been added.")]
    DuplicateList { key: String },

    /// The registry was used before it was loaded
    #[error("The list registry must be loaded before being used.")]
    NotLoaded,

    /// The list was removed from its registry and no longer accepts changes
    #[error("The '{key}' list has been removed.")]
    Closed { key: String },

    /// The write-through provider call failed
    #[error("Storage error: {0}")]
    Storage(#[from] ProviderError),
}

impl ListError {
    /// Whether this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, ListError::Validation(_))
    }

    /// Whether this is a duplicate item or duplicate list error
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            ListError::DuplicateItem { .. } | ListError::DuplicateList { .. }
        )
    }

    /// Whether this is a registry or list state error
    pub fn is_state(&self) -> bool {
        matches!(self, ListError::NotLoaded | ListError::Closed { .. })
    }

    /// Whether this wraps a provider failure
    pub fn is_storage(&self) -> bool {
        matches!(self, ListError::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_duplicate_item_display() {
        let error = ListError::DuplicateItem {
            list: "triage".to_string(),
            key: "p-1".to_string(),
        };

        assert_eq!(
            error.to_string(),
            "An item with the key 'p-1' has already been added to the 'triage' list."
        );
        assert!(error.is_duplicate());
        assert!(!error.is_storage());
    }

    #[test]
    fn test_storage_wraps_provider_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error: ListError = ProviderError::from(io_error).into();

        assert!(error.is_storage());
        assert!(error.to_string().contains("disk full"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_not_loaded_is_state() {
        assert!(ListError::NotLoaded.is_state());
        assert!(!ListError::NotLoaded.is_validation());
    }

    #[test]
    fn test_closed_is_state() {
        let error = ListError::Closed {
            key: "intake".to_string(),
        };

        assert!(error.is_state());
        assert_eq!(error.to_string(), "The 'intake' list has been removed.");
    }

    #[test]
    fn test_serialization_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error: ProviderError = json_error.into();

        assert!(error.to_string().starts_with("Serialization error"));
    }
}
