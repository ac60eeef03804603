//! The resolver's output.

use muster_core::{Point, TokenId};
use std::fmt;

/// Which proposal strategy ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolveMode {
    /// Remembered offsets.
    Memory,
    /// Formation geometry matched to reachable candidates.
    Geometry,
    /// A saved pattern bound slot by slot.
    Pattern,
    /// Shuffled candidates with no formation.
    Scatter,
}

impl fmt::Display for ResolveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Geometry => "geometry",
            Self::Pattern => "pattern",
            Self::Scatter => "scatter",
        })
    }
}

/// How one member's cell was obtained, best first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum PlacementTier {
    /// Remembered offset, validated.
    Memory,
    /// Saved-pattern slot, validated.
    Slot,
    /// Nearest candidate to the formation's ideal offset.
    Geometry,
    /// Shuffled candidate.
    Scattered,
    /// First fallback candidate search.
    Fallback,
    /// Emergency candidate search.
    Emergency,
    /// Nothing left; pinned to the anchor cell.
    Stacked,
}

/// One member's resolved cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// The member.
    pub token: TokenId,
    /// World top-left corner of the cell.
    pub top_left: Point,
    /// How it was found.
    pub tier: PlacementTier,
}

/// Every member's placement, in member order.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// Strategy that produced the proposals.
    pub mode: ResolveMode,
    /// One entry per member, in member order.
    pub placements: Vec<Placement>,
}

impl Resolution {
    /// Wrap a finished placement list.
    pub fn new(mode: ResolveMode, placements: Vec<Placement>) -> Self {
        Self { mode, placements }
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether there are no members.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Members placed with the given tier.
    pub fn count(&self, tier: PlacementTier) -> usize {
        self.placements.iter().filter(|p| p.tier == tier).count()
    }

    /// Members pinned to the anchor.
    pub fn stacked_count(&self) -> usize {
        self.count(PlacementTier::Stacked)
    }

    /// Members that needed a fallback search or were stacked.
    pub fn degraded_count(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| p.tier >= PlacementTier::Fallback)
            .count()
    }

    /// Whether more than half the members could not be placed.
    pub fn is_infeasible(&self) -> bool {
        self.stacked_count() * 2 > self.len()
    }

    /// Placement for one member.
    pub fn placement(&self, token: TokenId) -> Option<&Placement> {
        self.placements.iter().find(|p| p.token == token)
    }
}
