//! User-defined patterns captured from a group.

use crate::error::FormationError;
use crate::pattern::settle;
use muster_core::{ActorId, AgentSnapshot, GridOffset, TokenId};

/// One saved slot.
///
/// `bound_token` and `bound_actor` remember who stood here when the
/// pattern was captured, so the same individual (or the same underlying
/// entity) can be re-seated in it later.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatternSlot {
    /// Offset from the anchor, within `-2..=2`.
    pub offset: GridOffset,
    /// Rank at capture time.
    pub rank: u32,
    /// Token seated here at capture time.
    pub bound_token: Option<TokenId>,
    /// Underlying entity seated here at capture time.
    pub bound_actor: Option<ActorId>,
}

impl PatternSlot {
    /// An unbound slot.
    pub fn new(offset: GridOffset, rank: u32) -> Self {
        Self {
            offset,
            rank,
            bound_token: None,
            bound_actor: None,
        }
    }
}

/// A named, fixed list of slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomPattern {
    /// Unique name within a library.
    pub name: String,
    /// Slots in rank order.
    pub slots: Vec<PatternSlot>,
}

impl CustomPattern {
    /// Build a pattern from explicit slots.
    pub fn new(name: impl Into<String>, slots: Vec<PatternSlot>) -> Self {
        Self {
            name: name.into(),
            slots,
        }
    }

    /// Record every member that has an offset, bound to its identities.
    ///
    /// Members without an offset are skipped. Fails with
    /// [`FormationError::EmptyPattern`] if nobody has one.
    pub fn capture(
        name: impl Into<String>,
        members: &[AgentSnapshot],
    ) -> Result<Self, FormationError> {
        let name = name.into();
        let slots: Vec<PatternSlot> = members
            .iter()
            .filter_map(|m| {
                m.offset.map(|offset| PatternSlot {
                    offset,
                    rank: m.rank.order,
                    bound_token: Some(m.token),
                    bound_actor: Some(m.actor),
                })
            })
            .collect();
        if slots.is_empty() {
            return Err(FormationError::EmptyPattern { name });
        }
        Ok(Self { name, slots })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the pattern has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slots rotated by `facing` degrees, bindings kept.
    ///
    /// Rotation follows the built-in generators, so collisions introduced
    /// by rounding move to the nearest free cell in slot order.
    pub fn rotated(&self, facing: f64) -> Vec<PatternSlot> {
        let points: Vec<(f64, f64)> = self
            .slots
            .iter()
            .map(|s| (f64::from(s.offset.dx), f64::from(s.offset.dy)))
            .collect();
        self.slots
            .iter()
            .zip(settle(&points, facing))
            .map(|(slot, offset)| PatternSlot {
                offset,
                ..slot.clone()
            })
            .collect()
    }
}
