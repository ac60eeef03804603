//! Error types shared across the Muster workspace.
//!
//! [`ProviderError`] is what collaborators report back to the core;
//! [`RosterError`] covers violations of roster invariants.

use crate::geom::GridOffset;
use crate::id::TokenId;
use std::error::Error;
use std::fmt;

/// A failure reported by a host collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderError {
    /// The referenced token (or its underlying entity) no longer exists.
    NotFound {
        /// The missing token.
        token: TokenId,
    },
    /// The host refused the request.
    Rejected {
        /// Host-supplied explanation.
        reason: String,
    },
    /// Persistent storage failed.
    Storage {
        /// Host-supplied explanation.
        reason: String,
    },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { token } => write!(f, "{token} not found"),
            Self::Rejected { reason } => write!(f, "request rejected: {reason}"),
            Self::Storage { reason } => write!(f, "storage failure: {reason}"),
        }
    }
}

impl Error for ProviderError {}

/// A roster invariant was violated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RosterError {
    /// The same token appears twice.
    DuplicateIdentity {
        /// The repeated token.
        token: TokenId,
    },
    /// Two members claim the same offset.
    DuplicateOffset {
        /// The contested offset.
        offset: GridOffset,
        /// First claimant.
        first: TokenId,
        /// Second claimant.
        second: TokenId,
    },
    /// The token is not a member of this roster.
    UnknownMember {
        /// The token looked up.
        token: TokenId,
    },
}

impl fmt::Display for RosterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateIdentity { token } => write!(f, "{token} appears twice in roster"),
            Self::DuplicateOffset {
                offset,
                first,
                second,
            } => write!(f, "offset {offset} claimed by both {first} and {second}"),
            Self::UnknownMember { token } => write!(f, "{token} is not a roster member"),
        }
    }
}

impl Error for RosterError {}
