//! Options and results of group operations.

use crate::error::PartyWarning;
use muster_assign::Resolution;
use muster_core::{FormationKind, Point, Roster, TokenId};
use muster_formation::CustomPattern;

/// Per-call overrides for [`Party::disperse`](crate::Party::disperse).
#[derive(Clone, Copy, Debug, Default)]
pub struct DisperseOptions<'o> {
    /// Facing to use instead of the roster's.
    pub facing: Option<f64>,
    /// Formation to use instead of the roster's when no member remembers
    /// an offset.
    pub formation: Option<FormationKind>,
    /// Saved pattern to seat members into, ignoring remembered offsets.
    pub pattern: Option<&'o CustomPattern>,
}

/// Result of a successful gather.
#[derive(Clone, Debug)]
pub struct GatherOutcome {
    /// The new surrogate.
    pub surrogate: TokenId,
    /// The roster stored behind it.
    pub roster: Roster,
    /// Non-fatal problems.
    pub warnings: Vec<PartyWarning>,
}

/// Result of a successful disperse or scatter.
#[derive(Clone, Debug)]
pub struct DisperseOutcome {
    /// `(original, replacement)` for every member that was recreated.
    pub restored: Vec<(TokenId, TokenId)>,
    /// Where every member was sent.
    pub resolution: Resolution,
    /// Non-fatal problems.
    pub warnings: Vec<PartyWarning>,
}

impl DisperseOutcome {
    /// Replacement token for an original member.
    pub fn replacement(&self, original: TokenId) -> Option<TokenId> {
        self.restored
            .iter()
            .find(|(o, _)| *o == original)
            .map(|(_, r)| *r)
    }
}

/// Result of removing one member.
#[derive(Clone, Debug)]
pub struct RemoveOutcome {
    /// The recreated token.
    pub restored: TokenId,
    /// Where it was placed.
    pub top_left: Point,
    /// Present when the removal left too few members and the rest of the
    /// group was dispersed.
    pub dispersed: Option<DisperseOutcome>,
    /// Non-fatal problems.
    pub warnings: Vec<PartyWarning>,
}
