//! Group lifecycle states.

use std::fmt;

/// Where a group is in its gather/disperse cycle.
///
/// ```text
/// Idle ──gather──▶ Gathering ──▶ Gathered ──disperse/scatter──▶ Dispersing ──▶ Idle
///                      │             ▲                              │
///                      └─▶ Idle      └────────── rollback ──────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GroupPhase {
    /// No surrogate exists.
    #[default]
    Idle,
    /// Agents are being merged.
    Gathering,
    /// A surrogate stands in for the group.
    Gathered,
    /// The surrogate is being split.
    Dispersing,
}

impl GroupPhase {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_become(self, next: GroupPhase) -> bool {
        use GroupPhase::*;
        matches!(
            (self, next),
            (Idle, Gathering)
                | (Gathering, Gathered)
                | (Gathering, Idle)
                | (Gathered, Dispersing)
                | (Dispersing, Idle)
                | (Dispersing, Gathered)
        )
    }
}

impl fmt::Display for GroupPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Gathering => "gathering",
            Self::Gathered => "gathered",
            Self::Dispersing => "dispersing",
        })
    }
}
