//! Splitting a surrogate back into its members.

use crate::error::{PartyError, PartyWarning};
use crate::host::{restore_descriptor, Host};
use crate::lease::BusyLease;
use crate::outcome::{DisperseOptions, DisperseOutcome};
use crate::party::{load_roster, locate_surrogate, Party};
use crate::phase::GroupPhase;
use muster_assign::{Placement, PlacementTier, ResolveMode, ResolveRequest, Resolution, Resolver};
use muster_core::{AgentLifecycle, Occupant, Roster, RosterStore, TokenId, TokenSet};
use muster_formation::FormationDefinition;
use muster_grid::Placer;
use rand::seq::SliceRandom;
use tracing::{debug, error, info, warn};

impl Party {
    /// Recreate every member around the surrogate and delete it.
    ///
    /// Positions come from the [`Resolver`]. If more than half the members
    /// would be stacked on the anchor, nothing is touched and
    /// [`PartyError::Infeasible`] is returned. Otherwise replacements are
    /// created (on the surrogate's cell when animating, then moved out),
    /// and only then is the surrogate deleted.
    pub fn disperse(
        &mut self,
        host: &mut Host<'_>,
        surrogate: TokenId,
        options: &DisperseOptions<'_>,
    ) -> Result<DisperseOutcome, PartyError> {
        let roster = load_roster(&*host.store, surrogate)?;
        let occupant = locate_surrogate(&host.scene, surrogate)?;
        let lease = self.begin_dispersal(&mut *host.store, surrogate)?;

        let cs = host.scene.cell_size();
        let anchor = occupant.center(cs);
        let placer = Placer::new(host.scene, self.config.placer.clone());
        let reachable = placer.build_reachable_set(anchor, self.config.reachable_cell_budget);
        let exclude: TokenSet = [surrogate].into_iter().collect();
        let formation =
            FormationDefinition::Builtin(options.formation.unwrap_or(roster.formation));
        let request = ResolveRequest {
            anchor,
            members: &roster.members,
            facing: options.facing.unwrap_or(roster.facing),
            formation: &formation,
            pattern: options.pattern,
            reachable: &reachable,
            exclude: &exclude,
        };
        let resolution = Resolver::new(&placer, self.config.resolver.clone()).resolve(&request);

        if resolution.is_infeasible() {
            self.transition(surrogate, GroupPhase::Gathered);
            return Err(infeasible(surrogate, &resolution));
        }
        self.complete(lease, &mut *host.lifecycle, &occupant, &roster, resolution)
    }

    /// Hook for a surrogate about to be deleted by something other than
    /// [`Party::disperse`].
    ///
    /// Returns `None` when the deletion may go ahead untouched: the token
    /// is not a group, or this party is already dispersing it. Otherwise
    /// the group is dispersed in place (the surrogate is deleted by that
    /// dispersal) and the outcome returned. An error means the group is
    /// still intact and the caller should cancel its deletion.
    pub fn intercept_delete(
        &mut self,
        host: &mut Host<'_>,
        surrogate: TokenId,
    ) -> Result<Option<DisperseOutcome>, PartyError> {
        let stored = host
            .store
            .load(surrogate)
            .map_err(PartyError::provider("load roster"))?;
        if stored.is_none() {
            return Ok(None);
        }
        let busy = host
            .store
            .is_busy(surrogate)
            .map_err(PartyError::provider("read busy flag"))?;
        if busy && self.phases.get(&surrogate) == Some(&GroupPhase::Dispersing) {
            debug!(surrogate = %surrogate, "deletion is part of a dispersal in flight");
            return Ok(None);
        }
        info!(surrogate = %surrogate, "surrogate deleted directly, dispersing instead");
        self.disperse(host, surrogate, &DisperseOptions::default()).map(Some)
    }

    /// Disperse with no regard for formation: members land on a random
    /// selection of the nearest free cells.
    ///
    /// Draws `2 × members` candidates, shuffles them with the party's RNG
    /// and takes the first `members`. The rollback rule still applies.
    pub fn emergency_scatter(
        &mut self,
        host: &mut Host<'_>,
        surrogate: TokenId,
    ) -> Result<DisperseOutcome, PartyError> {
        let roster = load_roster(&*host.store, surrogate)?;
        let occupant = locate_surrogate(&host.scene, surrogate)?;
        let lease = self.begin_dispersal(&mut *host.store, surrogate)?;

        let anchor = occupant.center(host.scene.cell_size());
        let placer = Placer::new(host.scene, self.config.placer.clone());
        let exclude: TokenSet = [surrogate].into_iter().collect();
        let mut pool = placer.find_reachable_candidates(anchor, 2 * roster.len(), &exclude);
        pool.shuffle(&mut self.rng);
        let anchor_tl = placer.origin_top_left(anchor);
        let placements = roster
            .members
            .iter()
            .enumerate()
            .map(|(i, m)| match pool.get(i) {
                Some(c) => Placement {
                    token: m.token,
                    top_left: c.top_left,
                    tier: PlacementTier::Scattered,
                },
                None => {
                    warn!(token = %m.token, "no free cell left, stacking on the anchor");
                    Placement {
                        token: m.token,
                        top_left: anchor_tl,
                        tier: PlacementTier::Stacked,
                    }
                }
            })
            .collect();
        let resolution = Resolution::new(ResolveMode::Scatter, placements);

        if resolution.is_infeasible() {
            self.transition(surrogate, GroupPhase::Gathered);
            return Err(infeasible(surrogate, &resolution));
        }
        self.complete(lease, &mut *host.lifecycle, &occupant, &roster, resolution)
    }

    /// Take the busy flag and mark the group as dispersing.
    ///
    /// Both disperse and scatter start here, so [`Party::intercept_delete`]
    /// recognises the surrogate deletion either of them ends with.
    pub(crate) fn begin_dispersal<'s, S: RosterStore + ?Sized>(
        &mut self,
        store: &'s mut S,
        surrogate: TokenId,
    ) -> Result<BusyLease<'s, S>, PartyError> {
        let lease = BusyLease::acquire(store, surrogate)
            .map_err(PartyError::provider("acquire busy flag"))?;
        self.transition(surrogate, GroupPhase::Dispersing);
        Ok(lease)
    }

    /// The destructive half shared by disperse and scatter.
    fn complete<S: RosterStore + ?Sized>(
        &mut self,
        mut lease: BusyLease<'_, S>,
        lifecycle: &mut dyn AgentLifecycle,
        occupant: &Occupant,
        roster: &Roster,
        resolution: Resolution,
    ) -> Result<DisperseOutcome, PartyError> {
        let surrogate = lease.surrogate();
        let mut warnings = Vec::new();
        if lease.recovered() {
            warnings.push(PartyWarning::StaleBusyFlag { surrogate });
        }
        let stacked = resolution.stacked_count();
        if stacked > 0 {
            warnings.push(PartyWarning::Stacked { count: stacked });
        }

        let mut restored = Vec::with_capacity(roster.len());
        let mut last_failure = None;
        for (member, placement) in roster.members.iter().zip(&resolution.placements) {
            let start = if self.config.animate {
                occupant.top_left
            } else {
                placement.top_left
            };
            match lifecycle.create(&restore_descriptor(member, start)) {
                Ok(token) => restored.push((member.token, token, placement.top_left)),
                Err(source) => {
                    warn!(token = %member.token, error = %source, "could not restore member, skipping");
                    last_failure = Some(source.clone());
                    warnings.push(PartyWarning::CreateFailed {
                        token: member.token,
                        source,
                    });
                }
            }
        }
        if restored.is_empty() {
            if let Some(source) = last_failure {
                error!(surrogate = %surrogate, error = %source, "no member could be restored; surrogate kept");
                self.transition(surrogate, GroupPhase::Gathered);
                return Err(PartyError::Provider {
                    context: "restore members",
                    source,
                });
            }
        }

        if self.config.animate {
            for &(_, token, top_left) in &restored {
                if let Err(source) = lifecycle.move_to(token, top_left) {
                    warn!(token = %token, error = %source, "could not move restored member");
                    warnings.push(PartyWarning::MoveFailed { token, source });
                }
            }
        }

        if let Err(source) = lifecycle.delete(surrogate) {
            error!(surrogate = %surrogate, error = %source, step = "delete surrogate", "dispersal failed after members were restored");
            self.transition(surrogate, GroupPhase::Gathered);
            return Err(PartyError::Provider {
                context: "delete surrogate",
                source,
            });
        }
        if let Err(source) = lease.store().remove(surrogate) {
            error!(surrogate = %surrogate, error = %source, step = "forget roster", "dispersal failed after surrogate was deleted");
            self.transition(surrogate, GroupPhase::Idle);
            return Err(PartyError::Provider {
                context: "forget roster",
                source,
            });
        }
        drop(lease);
        self.transition(surrogate, GroupPhase::Idle);

        info!(
            surrogate = %surrogate,
            mode = %resolution.mode,
            restored = restored.len(),
            members = roster.len(),
            degraded = resolution.degraded_count(),
            "group dispersed"
        );
        Ok(DisperseOutcome {
            restored: restored.into_iter().map(|(o, r, _)| (o, r)).collect(),
            resolution,
            warnings,
        })
    }
}

fn infeasible(surrogate: TokenId, resolution: &Resolution) -> PartyError {
    let unplaced = resolution.stacked_count();
    warn!(
        surrogate = %surrogate,
        unplaced,
        total = resolution.len(),
        "too few free cells, dispersal rolled back"
    );
    PartyError::Infeasible {
        unplaced,
        total: resolution.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartyConfig;
    use crate::host::LiveAgent;
    use muster_core::{ActorId, Footprint};
    use muster_test_utils::{GridScene, MemoryRosterStore, RecordingLifecycle};

    fn gathered() -> (GridScene, RecordingLifecycle, MemoryRosterStore, Party, TokenId) {
        let scene = GridScene::new(100.0, 9, 9);
        let mut life = RecordingLifecycle::new(scene.shared_occupants());
        let mut store = MemoryRosterStore::new();
        let agents: Vec<LiveAgent> = [(1, 3), (2, 5)]
            .into_iter()
            .map(|(id, col)| {
                let top_left = scene.cell(col, 4);
                scene.shared_occupants().lock().unwrap().push(Occupant {
                    token: TokenId(id),
                    top_left,
                    footprint: Footprint::UNIT,
                });
                LiveAgent::new(TokenId(id), ActorId(id), top_left)
            })
            .collect();
        let mut party = Party::new(PartyConfig::default()).unwrap();
        let s = party
            .gather(&mut Host::new(scene.view(), &mut life, &mut store), &agents, None)
            .unwrap()
            .surrogate;
        (scene, life, store, party, s)
    }

    #[test]
    fn direct_delete_becomes_a_dispersal() {
        let (scene, mut life, mut store, mut party, s) = gathered();
        let out = party
            .intercept_delete(&mut Host::new(scene.view(), &mut life, &mut store), s)
            .unwrap()
            .expect("group dispersed");
        assert_eq!(out.restored.len(), 2);
        assert!(store.get(s).is_none());
        assert!(life.position(s).is_none());
    }

    #[test]
    fn plain_tokens_pass_through() {
        let (scene, mut life, mut store, mut party, _) = gathered();
        let verdict = party
            .intercept_delete(&mut Host::new(scene.view(), &mut life, &mut store), TokenId(99))
            .unwrap();
        assert!(verdict.is_none());
    }

    #[test]
    fn dispersal_in_flight_is_left_alone() {
        let (scene, mut life, mut store, mut party, s) = gathered();
        store.set_busy(s, true).unwrap();
        party.transition(s, GroupPhase::Dispersing);
        let verdict = party
            .intercept_delete(&mut Host::new(scene.view(), &mut life, &mut store), s)
            .unwrap();
        assert!(verdict.is_none());
        assert!(store.get(s).is_some());
    }

    #[test]
    fn dispersals_in_flight_are_marked() {
        let (_scene, _life, mut store, mut party, s) = gathered();
        let mut lease = party.begin_dispersal(&mut store, s).unwrap();
        assert_eq!(party.phase(&*lease.store(), s).unwrap(), GroupPhase::Dispersing);
        assert!(lease.store().busy(s));
        drop(lease);
        assert!(!store.busy(s));
    }

    #[test]
    fn rolled_back_scatter_returns_to_gathered() {
        let scene = GridScene::new(100.0, 9, 9).with_walled_box(4, 4, 1, 1);
        let mut life = RecordingLifecycle::new(scene.shared_occupants());
        let mut store = MemoryRosterStore::new();
        let top_left = scene.cell(4, 4);
        let agents: Vec<LiveAgent> = (1..=3)
            .map(|id| {
                scene.shared_occupants().lock().unwrap().push(Occupant {
                    token: TokenId(id),
                    top_left,
                    footprint: Footprint::UNIT,
                });
                LiveAgent::new(TokenId(id), ActorId(id), top_left)
            })
            .collect();
        let mut party = Party::new(PartyConfig::default()).unwrap();
        let s = party
            .gather(&mut Host::new(scene.view(), &mut life, &mut store), &agents, None)
            .unwrap()
            .surrogate;

        let err = party
            .emergency_scatter(&mut Host::new(scene.view(), &mut life, &mut store), s)
            .unwrap_err();
        assert_eq!(err, PartyError::Infeasible { unplaced: 2, total: 3 });
        assert_eq!(party.phase(&store, s).unwrap(), GroupPhase::Gathered);
        assert!(!store.busy(s));
    }

    #[test]
    fn stale_flag_without_dispersal_still_disperses() {
        let (scene, mut life, mut store, mut party, s) = gathered();
        store.set_busy(s, true).unwrap();
        let out = party
            .intercept_delete(&mut Host::new(scene.view(), &mut life, &mut store), s)
            .unwrap()
            .expect("group dispersed");
        assert!(out
            .warnings
            .contains(&PartyWarning::StaleBusyFlag { surrogate: s }));
    }
}
