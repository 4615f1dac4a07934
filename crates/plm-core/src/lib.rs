//! Core types for the persistent list manager
//!
//! This crate holds the pieces shared by every layer:
//!
//! - [`Item`]: the unit stored in a list
//! - [`ListKind`]: the closed set of ordering strategies
//! - [`ItemRecord`] / [`ListRecord`]: the shapes handed to storage providers
//! - [`EventBus`]: ordered, synchronous listener dispatch
//! - [`ListError`] / [`ProviderError`]: the error taxonomy
//!
//! # Example
//!
//! ```rust
//! use plm_core::{Item, ListKind};
//!
//! let item = Item::new("visit-42").with_creator("nurse-7");
//! assert_eq!(item.key(), "visit-42");
//! assert_eq!("stack".parse::<ListKind>().unwrap(), ListKind::Stack);
//! ```

pub mod error;
pub mod event;
pub mod item;
pub mod kind;
pub mod record;

pub use error::{ListError, ListResult, ProviderError, ProviderResult};
pub use event::{
    EventBus, ListEvent, ListEventListener, ListOperation, ListenerId,
};
pub use item::Item;
pub use kind::ListKind;
pub use record::{ItemRecord, ListRecord, ListRef, OrderUpdate};

/// Maximum number of characters allowed in an item or list key
pub const MAX_KEY_LENGTH: usize = 250;

/// Validate a list or item key
///
/// Keys must contain at least one non-whitespace character and at most
/// [`MAX_KEY_LENGTH`] characters.
pub fn validate_key(key: &str, what: &str) -> ListResult<()> {
    if key.trim().is_empty() {
        return Err(ListError::Validation(format!("The {} key has no content.", what)));
    }
    if key.chars().count() > MAX_KEY_LENGTH {
        return Err(ListError::Validation(format!(
            "The {} key must be {} characters or less.",
            what, MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
