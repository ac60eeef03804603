//! Error types for the formation library.

use muster_core::{GridOffset, ProviderError};
use std::error::Error;
use std::fmt;

/// Errors from saving, loading or applying formations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormationError {
    /// No built-in or saved pattern has this name.
    UnknownPattern {
        /// The requested name.
        name: String,
    },
    /// The name is empty or only whitespace.
    InvalidName {
        /// The rejected name.
        name: String,
    },
    /// The name belongs to a built-in formation.
    ReservedName {
        /// The rejected name.
        name: String,
    },
    /// The pattern has no slots.
    EmptyPattern {
        /// The pattern's name.
        name: String,
    },
    /// A slot lies outside `-2..=2` or repeats an earlier slot.
    InvalidSlot {
        /// The pattern's name.
        name: String,
        /// The offending offset.
        offset: GridOffset,
    },
    /// The pattern store failed.
    Store(ProviderError),
}

impl fmt::Display for FormationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPattern { name } => write!(f, "unknown formation '{name}'"),
            Self::InvalidName { name } => write!(f, "invalid formation name '{name}'"),
            Self::ReservedName { name } => {
                write!(f, "'{name}' is a built-in formation and cannot be replaced")
            }
            Self::EmptyPattern { name } => write!(f, "formation '{name}' has no slots"),
            Self::InvalidSlot { name, offset } => {
                write!(f, "formation '{name}' has an invalid slot at {offset}")
            }
            Self::Store(e) => write!(f, "pattern store: {e}"),
        }
    }
}

impl Error for FormationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ProviderError> for FormationError {
    fn from(e: ProviderError) -> Self {
        Self::Store(e)
    }
}
