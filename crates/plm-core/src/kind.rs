//! List kinds

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ListError;

/// The ordering strategy a list is created with
///
/// The kind is fixed at creation and persisted as its lowercase name, which
/// is how the registry resolves a constructor for each stored list on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// First in, first out
    Queue,
    /// Last in, first out
    Stack,
    /// Highest priority first, ties by order then arrival
    Priority,
}

impl ListKind {
    /// All built-in kinds
    pub const ALL: [ListKind; 3] = [ListKind::Queue, ListKind::Stack, ListKind::Priority];

    /// Persisted name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Queue => "queue",
            ListKind::Stack => "stack",
            ListKind::Priority => "priority",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListKind {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "queue" => Ok(ListKind::Queue),
            "stack" => Ok(ListKind::Stack),
            "priority" => Ok(ListKind::Priority),
            other => Err(ListError::Validation(format!(
                "Undefined list kind '{}'.",
                other
            ))),
        }
    }
}
