//! Seating a roster into a saved pattern.
//!
//! Binding is a pure proposal: [`bind_slots`] computes every member's new
//! offset without touching the roster, and [`apply_bindings`] writes the
//! whole proposal in one batch.

use crate::custom::PatternSlot;
use crate::rotate::nearest_free;
use indexmap::IndexSet;
use muster_core::{AgentSnapshot, GridOffset, Roster, TokenId, OFFSET_LIMIT};
use tracing::debug;

/// Widest Chebyshev ring searched around a target.
const SPIRAL_RADIUS: i32 = 4;

/// How a member was matched to its offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotMatch {
    /// The slot was bound to this exact token.
    Token,
    /// The slot was bound to the same underlying actor.
    Actor,
    /// A leftover slot, handed out in roster order.
    Free,
    /// No slot left; the nearest free cell around the member's target.
    Spiral,
    /// The arrangement grid is full; the member has no offset.
    Unplaced,
}

/// One member's proposed offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    /// The member.
    pub token: TokenId,
    /// Proposed offset, `None` only when matched as [`SlotMatch::Unplaced`].
    pub offset: Option<GridOffset>,
    /// How the offset was chosen.
    pub matched: SlotMatch,
}

/// Nearest cell to `target` (clamped into `-2..=2`) that is not in `used`,
/// staying inside the arrangement grid.
pub fn spiral_free(target: GridOffset, used: &IndexSet<GridOffset>) -> Option<GridOffset> {
    let t = target.clamped();
    nearest_free(
        f64::from(t.dx),
        f64::from(t.dy),
        used,
        Some(OFFSET_LIMIT),
        SPIRAL_RADIUS,
    )
}

/// Propose an offset for every member, in member order.
///
/// Slots go first to the member whose token they were bound to, then to a
/// member with the same actor, then to the remaining members in roster
/// order. Members left over spiral out from their current offset (or the
/// anchor) to the nearest cell no one has claimed.
pub fn bind_slots(slots: &[PatternSlot], members: &[AgentSnapshot]) -> Vec<Binding> {
    let mut taken = vec![false; slots.len()];
    let mut chosen: Vec<Option<(usize, SlotMatch)>> = vec![None; members.len()];

    for (mi, m) in members.iter().enumerate() {
        if let Some(si) = (0..slots.len())
            .find(|&si| !taken[si] && slots[si].bound_token == Some(m.token))
        {
            taken[si] = true;
            chosen[mi] = Some((si, SlotMatch::Token));
        }
    }
    for (mi, m) in members.iter().enumerate() {
        if chosen[mi].is_some() {
            continue;
        }
        if let Some(si) = (0..slots.len())
            .find(|&si| !taken[si] && slots[si].bound_actor == Some(m.actor))
        {
            taken[si] = true;
            chosen[mi] = Some((si, SlotMatch::Actor));
        }
    }
    let mut free = (0..slots.len()).filter(|&si| !taken[si]).collect::<Vec<_>>().into_iter();
    for pick in chosen.iter_mut() {
        if pick.is_none() {
            match free.next() {
                Some(si) => *pick = Some((si, SlotMatch::Free)),
                None => break,
            }
        }
    }

    let mut used: IndexSet<GridOffset> = chosen
        .iter()
        .flatten()
        .map(|&(si, _)| slots[si].offset)
        .collect();
    members
        .iter()
        .zip(chosen)
        .map(|(m, pick)| match pick {
            Some((si, matched)) => Binding {
                token: m.token,
                offset: Some(slots[si].offset),
                matched,
            },
            None => {
                let target = m.offset.unwrap_or(GridOffset::ORIGIN);
                match spiral_free(target, &used) {
                    Some(cell) => {
                        used.insert(cell);
                        Binding {
                            token: m.token,
                            offset: Some(cell),
                            matched: SlotMatch::Spiral,
                        }
                    }
                    None => {
                        debug!(token = %m.token, "arrangement grid full, member left unplaced");
                        Binding {
                            token: m.token,
                            offset: None,
                            matched: SlotMatch::Unplaced,
                        }
                    }
                }
            }
        })
        .collect()
}

/// Write a proposal into the roster. Members not named keep their offset.
pub fn apply_bindings(roster: &mut Roster, bindings: &[Binding]) {
    for b in bindings {
        if let Some(m) = roster.members.iter_mut().find(|m| m.token == b.token) {
            m.offset = b.offset;
        }
    }
}
