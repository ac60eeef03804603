//! Merging agents into a surrogate.

use crate::error::{PartyError, PartyWarning};
use crate::host::{Host, LiveAgent};
use crate::outcome::GatherOutcome;
use crate::party::Party;
use crate::phase::GroupPhase;
use indexmap::{IndexMap, IndexSet};
use muster_core::{
    AgentDescriptor, Footprint, GridOffset, Point, Presentation, Roster, TokenId, TokenSet,
    OFFSET_LIMIT,
};
use muster_formation::spiral_free;
use muster_grid::Placer;
use tracing::{error, info, warn};

impl Party {
    /// Replace `agents` with a single surrogate that remembers where each
    /// of them stood.
    ///
    /// The anchor is the centroid of the agents' footprint centers; the
    /// surrogate occupies the cell under it. Offsets come from `draft`
    /// where given, otherwise from each agent's cell relative to the
    /// anchor cell; collisions spiral out to the nearest free cell in
    /// `-2..=2`. The first agent leads and lends the surrogate its look.
    ///
    /// Members leave with remembered offsets, so a fresh group
    /// disperses back to where its members stood. To lay it out in a
    /// built-in formation instead, apply one with [`Party::apply_pattern`],
    /// which clears the remembered offsets.
    ///
    /// The surrogate is created and its roster stored before any original
    /// is removed.
    pub fn gather(
        &mut self,
        host: &mut Host<'_>,
        agents: &[LiveAgent],
        draft: Option<&IndexMap<TokenId, GridOffset>>,
    ) -> Result<GatherOutcome, PartyError> {
        if agents.len() < self.config.min_members {
            return Err(PartyError::TooFewAgents {
                given: agents.len(),
                required: self.config.min_members,
            });
        }
        let mut seen = TokenSet::with_capacity(agents.len());
        for a in agents {
            let stored = host
                .store
                .load(a.token)
                .map_err(PartyError::provider("load roster"))?;
            if a.surrogate || stored.is_some() {
                return Err(PartyError::NestedSurrogate { token: a.token });
            }
            if !seen.insert(a.token) {
                return Err(PartyError::DuplicateAgent { token: a.token });
            }
        }

        let cs = host.scene.cell_size();
        let n = agents.len() as f64;
        let sum = agents
            .iter()
            .fold(Point::default(), |acc, a| acc + a.center(cs));
        let anchor = sum * (1.0 / n);
        let placer = Placer::new(host.scene, self.config.placer.clone());
        let anchor_tl = placer.origin_top_left(anchor);

        let deltas: Vec<GridOffset> = agents
            .iter()
            .map(|a| {
                let tl = host.scene.grid.snap_top_left(a.top_left);
                GridOffset::round((tl.x - anchor_tl.x) / cs, (tl.y - anchor_tl.y) / cs)
            })
            .collect();
        let drafted: Vec<Option<GridOffset>> = agents
            .iter()
            .map(|a| draft.and_then(|d| d.get(&a.token).copied()))
            .collect();
        let offsets = gather_offsets(&deltas, &drafted);

        let members = agents
            .iter()
            .zip(offsets)
            .enumerate()
            .map(|(i, (a, offset))| {
                let mut m = a.snapshot(i as u32);
                m.offset = offset;
                m
            })
            .collect();
        let mut roster = Roster::new(members, self.config.default_formation);
        roster.renumber();
        roster.validate()?;

        let leader = &agents[0];
        let descriptor = AgentDescriptor {
            actor: leader.actor,
            presentation: Presentation {
                footprint: Footprint::UNIT,
                ..leader.presentation.clone()
            },
            attributes: leader.attributes.clone(),
            top_left: anchor_tl,
            restores: None,
            surrogate: true,
        };
        let surrogate = host
            .lifecycle
            .create(&descriptor)
            .map_err(PartyError::provider("create surrogate"))?;
        self.transition(surrogate, GroupPhase::Gathering);

        if let Err(source) = host.store.save(surrogate, &roster) {
            error!(surrogate = %surrogate, error = %source, step = "save roster", "gather failed, removing surrogate");
            if let Err(e) = host.lifecycle.delete(surrogate) {
                error!(surrogate = %surrogate, error = %e, "could not remove surrogate after failed gather");
            }
            self.transition(surrogate, GroupPhase::Idle);
            return Err(PartyError::Provider {
                context: "save roster",
                source,
            });
        }

        let mut warnings = Vec::new();
        for a in agents {
            if self.config.animate {
                if let Err(source) = host.lifecycle.move_to(a.token, anchor_tl) {
                    warn!(token = %a.token, error = %source, "could not slide agent into the group");
                    warnings.push(PartyWarning::MoveFailed {
                        token: a.token,
                        source,
                    });
                }
            }
            if let Err(source) = host.lifecycle.delete(a.token) {
                warn!(token = %a.token, error = %source, "could not remove gathered agent");
                warnings.push(PartyWarning::DeleteFailed {
                    token: a.token,
                    source,
                });
            }
        }
        self.transition(surrogate, GroupPhase::Gathered);
        info!(surrogate = %surrogate, members = roster.len(), "group gathered");
        Ok(GatherOutcome {
            surrogate,
            roster,
            warnings,
        })
    }
}

/// Resolve gather offsets from raw cell deltas and optional drafts.
///
/// Drafts (clamped) claim their cells first. Remaining members use their
/// delta: on an axis whose spread exceeds `-2..=2` the deltas are shifted
/// to center them, then clamped. Members whose cell is taken spiral out
/// afterwards, in member order. `None` means the arrangement grid is full.
pub(crate) fn gather_offsets(
    deltas: &[GridOffset],
    drafted: &[Option<GridOffset>],
) -> Vec<Option<GridOffset>> {
    let n = deltas.len();
    let mut out: Vec<Option<GridOffset>> = vec![None; n];
    let mut used: IndexSet<GridOffset> = IndexSet::with_capacity(n);
    let mut projected = Vec::with_capacity(n);

    for i in 0..n {
        match drafted.get(i).copied().flatten().map(GridOffset::clamped) {
            Some(o) if used.insert(o) => out[i] = Some(o),
            Some(o) => projected.push((i, o)),
            None => projected.push((i, deltas[i])),
        }
    }

    let fresh: Vec<GridOffset> = projected
        .iter()
        .filter(|(i, _)| drafted.get(*i).copied().flatten().is_none())
        .map(|(_, o)| *o)
        .collect();
    let shift = GridOffset::new(
        recenter(fresh.iter().map(|o| o.dx)),
        recenter(fresh.iter().map(|o| o.dy)),
    );

    let mut conflicts = Vec::new();
    for (i, raw) in projected {
        let target = if drafted.get(i).copied().flatten().is_some() {
            raw
        } else {
            (raw + shift).clamped()
        };
        if used.insert(target) {
            out[i] = Some(target);
        } else {
            conflicts.push((i, target));
        }
    }
    for (i, target) in conflicts {
        out[i] = spiral_free(target, &used);
        if let Some(cell) = out[i] {
            used.insert(cell);
        }
    }
    out
}

/// Shift that centers an axis whose values overflow the arrangement grid.
fn recenter(values: impl Iterator<Item = i32> + Clone) -> i32 {
    let (Some(lo), Some(hi)) = (values.clone().min(), values.max()) else {
        return 0;
    };
    if lo >= -OFFSET_LIMIT && hi <= OFFSET_LIMIT {
        return 0;
    }
    -(lo + hi).div_euclid(2)
}
