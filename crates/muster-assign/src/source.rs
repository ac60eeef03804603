//! Where a member's proposed position comes from.

use muster_core::GridOffset;
use muster_formation::{rotate_offsets, PatternSlot};
use muster_grid::Candidate;

/// One member's proposal, before validation.
#[derive(Clone, Debug, PartialEq)]
pub enum PositionSource {
    /// A free, reachable cell from the candidate search.
    Reachable(Candidate),
    /// The member's remembered offset from the anchor.
    Remembered(GridOffset),
    /// A saved-pattern slot the member was bound to.
    BoundSlot(PatternSlot),
}

impl PositionSource {
    /// The offset from the anchor, for sources expressed as offsets.
    pub fn offset(&self) -> Option<GridOffset> {
        match self {
            Self::Reachable(_) => None,
            Self::Remembered(offset) => Some(*offset),
            Self::BoundSlot(slot) => Some(slot.offset),
        }
    }

    /// Whether this source names the anchor's own cell.
    pub fn is_anchor_slot(&self) -> bool {
        match self {
            Self::Reachable(c) => c.distance == 0,
            Self::Remembered(offset) => offset.is_origin(),
            Self::BoundSlot(slot) => slot.offset.is_origin(),
        }
    }
}

/// Turn every offset-based source by `facing` as one arrangement.
///
/// Offsets that would round onto the same cell are kept apart, the later
/// one moving to the nearest free cell.
pub fn rotate_sources(sources: &mut [Option<PositionSource>], facing: f64) {
    let offsets: Vec<GridOffset> = sources
        .iter()
        .flatten()
        .filter_map(PositionSource::offset)
        .collect();
    let mut rotated = rotate_offsets(&offsets, facing).into_iter();
    for source in sources.iter_mut().flatten() {
        let target = match source {
            PositionSource::Reachable(_) => continue,
            PositionSource::Remembered(offset) => offset,
            PositionSource::BoundSlot(slot) => &mut slot.offset,
        };
        if let Some(r) = rotated.next() {
            *target = r;
        }
    }
}
