//! Error and warning types for group operations.

use crate::config::ConfigError;
use muster_core::{ProviderError, RosterError, TokenId};
use muster_formation::FormationError;
use std::error::Error;
use std::fmt;

/// Why a group operation did not happen.
///
/// Every variant leaves the group as it was, except [`PartyError::Provider`]
/// raised after replacements were created, which is logged at `error`.
#[derive(Clone, Debug, PartialEq)]
pub enum PartyError {
    /// Fewer agents than the configured minimum.
    TooFewAgents {
        /// Agents supplied.
        given: usize,
        /// Required minimum.
        required: usize,
    },
    /// A surrogate was supplied where a plain agent is required.
    NestedSurrogate {
        /// The offending token.
        token: TokenId,
    },
    /// The same token was supplied twice, or is already a member.
    DuplicateAgent {
        /// The repeated token.
        token: TokenId,
    },
    /// The token has no roster behind it.
    NotASurrogate {
        /// The token asked about.
        token: TokenId,
    },
    /// More than half the roster could not be placed; nothing was changed.
    Infeasible {
        /// Members with no valid cell.
        unplaced: usize,
        /// Roster size.
        total: usize,
    },
    /// A collaborator failed at a step the operation cannot skip.
    Provider {
        /// The step that failed.
        context: &'static str,
        /// The collaborator's error.
        source: ProviderError,
    },
    /// Formation library failure.
    Formation(FormationError),
    /// Roster invariant violation.
    Roster(RosterError),
    /// Invalid configuration.
    Config(ConfigError),
}

impl PartyError {
    pub(crate) fn provider(context: &'static str) -> impl FnOnce(ProviderError) -> PartyError {
        move |source| PartyError::Provider { context, source }
    }
}

impl fmt::Display for PartyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewAgents { given, required } => {
                write!(f, "need at least {required} agents to gather, got {given}")
            }
            Self::NestedSurrogate { token } => {
                write!(f, "{token} is already a group and cannot be gathered")
            }
            Self::DuplicateAgent { token } => write!(f, "{token} appears more than once"),
            Self::NotASurrogate { token } => write!(f, "{token} is not a group"),
            Self::Infeasible { unplaced, total } => write!(
                f,
                "only {} of {total} members could be placed; group left intact",
                total - unplaced
            ),
            Self::Provider { context, source } => write!(f, "{context}: {source}"),
            Self::Formation(e) => write!(f, "formation: {e}"),
            Self::Roster(e) => write!(f, "roster: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for PartyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Provider { source, .. } => Some(source),
            Self::Formation(e) => Some(e),
            Self::Roster(e) => Some(e),
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormationError> for PartyError {
    fn from(e: FormationError) -> Self {
        Self::Formation(e)
    }
}

impl From<RosterError> for PartyError {
    fn from(e: RosterError) -> Self {
        Self::Roster(e)
    }
}

impl From<ConfigError> for PartyError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Something that went wrong without stopping the operation.
#[derive(Clone, Debug, PartialEq)]
pub enum PartyWarning {
    /// A busy flag left by an earlier attempt was cleared.
    StaleBusyFlag {
        /// The group.
        surrogate: TokenId,
    },
    /// Some members could not be placed and share the anchor cell.
    Stacked {
        /// How many.
        count: usize,
    },
    /// A member's token could not be created and was skipped.
    CreateFailed {
        /// The member's original token.
        token: TokenId,
        /// The collaborator's error.
        source: ProviderError,
    },
    /// A token could not be moved to its final cell.
    MoveFailed {
        /// The token.
        token: TokenId,
        /// The collaborator's error.
        source: ProviderError,
    },
    /// A token could not be deleted.
    DeleteFailed {
        /// The token.
        token: TokenId,
        /// The collaborator's error.
        source: ProviderError,
    },
}

impl fmt::Display for PartyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleBusyFlag { surrogate } => {
                write!(f, "recovered a stale busy flag on {surrogate}")
            }
            Self::Stacked { count } => write!(f, "{count} member(s) stacked on the anchor"),
            Self::CreateFailed { token, source } => write!(f, "could not restore {token}: {source}"),
            Self::MoveFailed { token, source } => write!(f, "could not move {token}: {source}"),
            Self::DeleteFailed { token, source } => write!(f, "could not delete {token}: {source}"),
        }
    }
}
