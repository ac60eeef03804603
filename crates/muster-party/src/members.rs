//! Joining and leaving an active group.

use crate::error::{PartyError, PartyWarning};
use crate::host::{restore_descriptor, Host, LiveAgent};
use crate::lease::BusyLease;
use crate::outcome::{DisperseOptions, RemoveOutcome};
use crate::party::{load_roster, locate_surrogate, unknown_member, Party};
use muster_core::{GridOffset, Roster, TokenId, TokenSet, OFFSET_LIMIT};
use muster_formation::{rotate_offsets, rotate_point, spiral_free};
use muster_grid::Placer;
use tracing::{error, info, warn};

impl Party {
    /// Fold a live agent into an existing group.
    ///
    /// The agent remembers its current cell relative to the surrogate,
    /// un-rotated by the group's facing so that a later dispersal brings
    /// it back there. The roster is stored before the agent is removed; if
    /// the removal fails the previous roster is put back.
    pub fn add_member(
        &mut self,
        host: &mut Host<'_>,
        surrogate: TokenId,
        agent: &LiveAgent,
    ) -> Result<Roster, PartyError> {
        let joining_group = host
            .store
            .load(agent.token)
            .map_err(PartyError::provider("load roster"))?;
        if agent.surrogate || joining_group.is_some() || agent.token == surrogate {
            return Err(PartyError::NestedSurrogate { token: agent.token });
        }
        let mut roster = load_roster(&*host.store, surrogate)?;
        if roster.member(agent.token).is_some() {
            return Err(PartyError::DuplicateAgent { token: agent.token });
        }
        let occupant = locate_surrogate(&host.scene, surrogate)?;
        let mut lease = BusyLease::acquire(&mut *host.store, surrogate)
            .map_err(PartyError::provider("acquire busy flag"))?;

        let cs = host.scene.cell_size();
        let anchor_tl = host.scene.grid.snap_top_left(occupant.top_left);
        let tl = host.scene.grid.snap_top_left(agent.top_left);
        let delta = GridOffset::round((tl.x - anchor_tl.x) / cs, (tl.y - anchor_tl.y) / cs);
        let offset = joining_offset(&roster, delta);

        let previous = roster.clone();
        let mut snapshot = agent.snapshot(roster.len() as u32);
        snapshot.offset = offset;
        roster.members.push(snapshot);
        roster.renumber();
        roster.validate()?;
        lease
            .store()
            .save(surrogate, &roster)
            .map_err(PartyError::provider("save roster"))?;

        if self.config.animate {
            if let Err(e) = host.lifecycle.move_to(agent.token, occupant.top_left) {
                warn!(token = %agent.token, error = %e, "could not slide agent into the group");
            }
        }
        if let Err(source) = host.lifecycle.delete(agent.token) {
            error!(surrogate = %surrogate, token = %agent.token, error = %source, "could not remove joining agent, restoring roster");
            if let Err(e) = lease.store().save(surrogate, &previous) {
                error!(surrogate = %surrogate, error = %e, "could not restore roster");
            }
            return Err(PartyError::Provider {
                context: "delete joining agent",
                source,
            });
        }
        info!(surrogate = %surrogate, token = %agent.token, members = roster.len(), "member added");
        Ok(roster)
    }

    /// Take one member out of a group and put it back in the scene.
    ///
    /// The member is recreated on the nearest reachable free cell other
    /// than the surrogate's own. If fewer than the configured minimum
    /// members remain, the rest of the group is dispersed; a lone
    /// survivor is sent to the surrogate's cell.
    pub fn remove_member(
        &mut self,
        host: &mut Host<'_>,
        surrogate: TokenId,
        token: TokenId,
    ) -> Result<RemoveOutcome, PartyError> {
        let mut roster = load_roster(&*host.store, surrogate)?;
        let member = roster.member(token).cloned().ok_or_else(|| unknown_member(token))?;
        let occupant = locate_surrogate(&host.scene, surrogate)?;
        let mut lease = BusyLease::acquire(&mut *host.store, surrogate)
            .map_err(PartyError::provider("acquire busy flag"))?;
        let mut warnings = Vec::new();
        if lease.recovered() {
            warnings.push(PartyWarning::StaleBusyFlag { surrogate });
        }

        let cs = host.scene.cell_size();
        let anchor = occupant.center(cs);
        let placer = Placer::new(host.scene, self.config.placer.clone());
        let exclude: TokenSet = [surrogate].into_iter().collect();
        let anchor_tl = placer.origin_top_left(anchor);
        let spot = placer
            .find_reachable_candidates(anchor, 2, &exclude)
            .into_iter()
            .find(|c| c.top_left != anchor_tl);
        let top_left = match spot {
            Some(c) => c.top_left,
            None => {
                warn!(token = %token, "no free cell beside the group, stacking on the anchor");
                warnings.push(PartyWarning::Stacked { count: 1 });
                anchor_tl
            }
        };
        let start = if self.config.animate {
            occupant.top_left
        } else {
            top_left
        };
        let restored = host
            .lifecycle
            .create(&restore_descriptor(&member, start))
            .map_err(PartyError::provider("restore member"))?;
        if self.config.animate {
            if let Err(source) = host.lifecycle.move_to(restored, top_left) {
                warn!(token = %restored, error = %source, "could not move restored member");
                warnings.push(PartyWarning::MoveFailed {
                    token: restored,
                    source,
                });
            }
        }

        roster.remove(token);
        let dissolve = roster.len() < self.config.min_members;
        if dissolve && roster.len() == 1 {
            roster.members[0].offset = Some(GridOffset::ORIGIN);
        }
        if let Err(source) = lease.store().save(surrogate, &roster) {
            error!(surrogate = %surrogate, token = %token, error = %source, "could not store roster, undoing removal");
            if let Err(e) = host.lifecycle.delete(restored) {
                error!(token = %restored, error = %e, "could not undo restored member");
            }
            return Err(PartyError::Provider {
                context: "save roster",
                source,
            });
        }
        drop(lease);
        info!(surrogate = %surrogate, token = %token, remaining = roster.len(), "member removed");

        let dispersed = if dissolve {
            Some(self.disperse(host, surrogate, &DisperseOptions::default())?)
        } else {
            None
        };
        Ok(RemoveOutcome {
            restored,
            top_left,
            dispersed,
            warnings,
        })
    }
}

/// Arrangement cell for a member joining `delta` cells from the anchor.
///
/// Free cells are tried nearest-first to the exact un-rotated position;
/// the first one that the whole roster's rotation carries back onto
/// `delta` wins. When none does, the un-rotated cell is clamped and
/// spirals out if taken.
fn joining_offset(roster: &Roster, delta: GridOffset) -> Option<GridOffset> {
    let (x, y) = rotate_point(f64::from(delta.dx), f64::from(delta.dy), -roster.facing);
    let claimed = roster.claimed_offsets();
    let mut free: Vec<GridOffset> = (-OFFSET_LIMIT..=OFFSET_LIMIT)
        .flat_map(|dx| (-OFFSET_LIMIT..=OFFSET_LIMIT).map(move |dy| GridOffset::new(dx, dy)))
        .filter(|c| !claimed.contains(c))
        .collect();
    let away = |c: &GridOffset| (f64::from(c.dx) - x).hypot(f64::from(c.dy) - y);
    free.sort_by(|a, b| away(a).total_cmp(&away(b)));

    let mut seated: Vec<GridOffset> = claimed.iter().copied().collect();
    let exact = free.into_iter().find(|&c| {
        seated.push(c);
        let lands = rotate_offsets(&seated, roster.facing).last() == Some(&delta);
        seated.pop();
        lands
    });
    exact.or_else(|| {
        let target = GridOffset::round(x, y).clamped();
        if claimed.contains(&target) {
            spiral_free(target, &claimed)
        } else {
            Some(target)
        }
    })
}

