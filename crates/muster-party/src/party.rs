//! The orchestrator and its roster-editing operations.

use crate::config::PartyConfig;
use crate::error::PartyError;
use crate::phase::GroupPhase;
use indexmap::IndexMap;
use muster_core::{
    FormationKind, GridOffset, Occupant, Roster, RosterError, RosterStore, SceneView, TokenId,
};
use muster_formation::{Binding, FormationLibrary, PatternStore};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Gathers agents into surrogates and disperses them again.
///
/// A `Party` holds only configuration, the scatter RNG and the phases of
/// the groups it has touched. Rosters live in the host's
/// [`RosterStore`]; every operation receives its collaborators through a
/// [`Host`](crate::Host).
pub struct Party {
    pub(crate) config: PartyConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) phases: IndexMap<TokenId, GroupPhase>,
}

impl Party {
    /// Create an orchestrator after validating `config`.
    pub fn new(config: PartyConfig) -> Result<Self, PartyError> {
        config.validate()?;
        let rng = ChaCha8Rng::seed_from_u64(config.scatter_seed);
        Ok(Self {
            config,
            rng,
            phases: IndexMap::new(),
        })
    }

    /// Configuration in effect.
    pub fn config(&self) -> &PartyConfig {
        &self.config
    }

    /// Replace the scatter RNG.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Phase of a group.
    ///
    /// Groups this party has not touched report `Gathered` if the store
    /// holds a roster for them and `Idle` otherwise.
    pub fn phase(
        &self,
        store: &dyn RosterStore,
        surrogate: TokenId,
    ) -> Result<GroupPhase, PartyError> {
        if let Some(&phase) = self.phases.get(&surrogate) {
            return Ok(phase);
        }
        let stored = store
            .load(surrogate)
            .map_err(PartyError::provider("load roster"))?;
        Ok(if stored.is_some() {
            GroupPhase::Gathered
        } else {
            GroupPhase::Idle
        })
    }

    pub(crate) fn transition(&mut self, surrogate: TokenId, next: GroupPhase) {
        let from = self
            .phases
            .get(&surrogate)
            .copied()
            .unwrap_or(GroupPhase::Gathered);
        if !from.can_become(next) {
            debug!(surrogate = %surrogate, from = %from, to = %next, "unexpected phase change");
        }
        if next == GroupPhase::Idle {
            self.phases.shift_remove(&surrogate);
        } else {
            self.phases.insert(surrogate, next);
        }
    }

    /// The roster behind a surrogate.
    pub fn get_active_roster(
        &self,
        store: &dyn RosterStore,
        surrogate: TokenId,
    ) -> Result<Roster, PartyError> {
        load_roster(store, surrogate)
    }

    /// Move a member to `offset` (clamped into `-2..=2`), swapping with the
    /// member already there. Returns the swapped member, if any.
    pub fn set_offset(
        &self,
        store: &mut dyn RosterStore,
        surrogate: TokenId,
        token: TokenId,
        offset: GridOffset,
    ) -> Result<Option<TokenId>, PartyError> {
        let mut roster = load_roster(store, surrogate)?;
        let displaced = roster.set_offset(token, offset.clamped())?;
        roster.validate()?;
        save_roster(store, surrogate, &roster)?;
        debug!(surrogate = %surrogate, token = %token, offset = %offset.clamped(), "offset edited");
        Ok(displaced)
    }

    /// Set the group's facing in degrees, normalised into `[0, 360)`.
    pub fn set_facing(
        &self,
        store: &mut dyn RosterStore,
        surrogate: TokenId,
        facing: f64,
    ) -> Result<(), PartyError> {
        let mut roster = load_roster(store, surrogate)?;
        roster.facing = facing.rem_euclid(360.0);
        save_roster(store, surrogate, &roster)
    }

    /// Set the formation used when no member remembers an offset.
    pub fn set_formation(
        &self,
        store: &mut dyn RosterStore,
        surrogate: TokenId,
        formation: FormationKind,
    ) -> Result<(), PartyError> {
        let mut roster = load_roster(store, surrogate)?;
        roster.formation = formation;
        save_roster(store, surrogate, &roster)
    }

    /// Seat the group into a pattern from `library` and store the result.
    pub fn apply_pattern<P: PatternStore>(
        &self,
        store: &mut dyn RosterStore,
        surrogate: TokenId,
        library: &FormationLibrary<P>,
        name: &str,
    ) -> Result<Vec<Binding>, PartyError> {
        let mut roster = load_roster(store, surrogate)?;
        let bindings = library.apply_pattern_to_roster(name, &mut roster)?;
        roster.validate()?;
        save_roster(store, surrogate, &roster)?;
        Ok(bindings)
    }
}

pub(crate) fn load_roster(
    store: &dyn RosterStore,
    surrogate: TokenId,
) -> Result<Roster, PartyError> {
    store
        .load(surrogate)
        .map_err(PartyError::provider("load roster"))?
        .ok_or(PartyError::NotASurrogate { token: surrogate })
}

pub(crate) fn save_roster(
    store: &mut dyn RosterStore,
    surrogate: TokenId,
    roster: &Roster,
) -> Result<(), PartyError> {
    store
        .save(surrogate, roster)
        .map_err(PartyError::provider("save roster"))
}

/// Where the surrogate currently stands.
pub(crate) fn locate_surrogate(
    scene: &SceneView<'_>,
    surrogate: TokenId,
) -> Result<Occupant, PartyError> {
    scene.occupants.locate(surrogate).ok_or(PartyError::Provider {
        context: "locate surrogate",
        source: muster_core::ProviderError::NotFound { token: surrogate },
    })
}

pub(crate) fn unknown_member(token: TokenId) -> PartyError {
    PartyError::Roster(RosterError::UnknownMember { token })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use muster_core::{ActorId, AgentSnapshot};
    use muster_formation::{CustomPattern, MemoryPatternStore, PatternSlot};
    use muster_test_utils::MemoryRosterStore;

    fn group() -> (MemoryRosterStore, TokenId) {
        let mut store = MemoryRosterStore::new();
        let mut roster = Roster::new(
            vec![
                AgentSnapshot::new(TokenId(1), ActorId(1)).with_offset(GridOffset::ORIGIN),
                AgentSnapshot::new(TokenId(2), ActorId(2)).with_offset(GridOffset::new(1, 0)),
            ],
            FormationKind::Line,
        );
        roster.renumber();
        store.save(TokenId(50), &roster).unwrap();
        (store, TokenId(50))
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = PartyConfig {
            min_members: 0,
            ..Default::default()
        };
        assert!(matches!(
            Party::new(cfg),
            Err(PartyError::Config(ConfigError::MinMembersTooSmall { .. }))
        ));
    }

    #[test]
    fn offsets_swap_and_clamp() {
        let party = Party::new(PartyConfig::default()).unwrap();
        let (mut store, s) = group();
        let displaced = party
            .set_offset(&mut store, s, TokenId(1), GridOffset::new(1, 0))
            .unwrap();
        assert_eq!(displaced, Some(TokenId(2)));
        let roster = party.get_active_roster(&store, s).unwrap();
        assert_eq!(roster.members[0].offset, Some(GridOffset::new(1, 0)));
        assert_eq!(roster.members[1].offset, Some(GridOffset::ORIGIN));

        party
            .set_offset(&mut store, s, TokenId(2), GridOffset::new(9, -9))
            .unwrap();
        let roster = party.get_active_roster(&store, s).unwrap();
        assert_eq!(roster.members[1].offset, Some(GridOffset::new(2, -2)));
    }

    #[test]
    fn unknown_member_and_group() {
        let party = Party::new(PartyConfig::default()).unwrap();
        let (mut store, s) = group();
        assert!(matches!(
            party.set_offset(&mut store, s, TokenId(9), GridOffset::ORIGIN),
            Err(PartyError::Roster(RosterError::UnknownMember { .. }))
        ));
        assert_eq!(
            party.get_active_roster(&store, TokenId(3)).unwrap_err(),
            PartyError::NotASurrogate { token: TokenId(3) }
        );
    }

    #[test]
    fn facing_and_formation_persist() {
        let party = Party::new(PartyConfig::default()).unwrap();
        let (mut store, s) = group();
        party.set_facing(&mut store, s, -90.0).unwrap();
        party.set_formation(&mut store, s, FormationKind::Wedge).unwrap();
        let roster = store.get(s).unwrap();
        assert_eq!(roster.facing, 270.0);
        assert_eq!(roster.formation, FormationKind::Wedge);
    }

    #[test]
    fn failed_save_surfaces_as_provider_error() {
        let party = Party::new(PartyConfig::default()).unwrap();
        let (mut store, s) = group();
        store.fail_saves(true);
        assert!(matches!(
            party.set_facing(&mut store, s, 90.0),
            Err(PartyError::Provider {
                context: "save roster",
                ..
            })
        ));
    }

    #[test]
    fn pattern_application_is_stored() {
        let party = Party::new(PartyConfig::default()).unwrap();
        let (mut store, s) = group();
        let mut library = FormationLibrary::open(MemoryPatternStore::new()).unwrap();
        library
            .save_pattern(CustomPattern::new(
                "column",
                vec![
                    PatternSlot::new(GridOffset::ORIGIN, 0),
                    PatternSlot::new(GridOffset::new(0, 1), 1),
                ],
            ))
            .unwrap();
        let bindings = party.apply_pattern(&mut store, s, &library, "column").unwrap();
        assert_eq!(bindings.len(), 2);
        let roster = store.get(s).unwrap();
        assert_eq!(roster.members[1].offset, Some(GridOffset::new(0, 1)));
        assert!(matches!(
            party.apply_pattern(&mut store, s, &library, "nope"),
            Err(PartyError::Formation(_))
        ));
    }

    #[test]
    fn phase_falls_back_to_store() {
        let party = Party::new(PartyConfig::default()).unwrap();
        let (store, s) = group();
        assert_eq!(party.phase(&store, s).unwrap(), GroupPhase::Gathered);
        assert_eq!(party.phase(&store, TokenId(3)).unwrap(), GroupPhase::Idle);
    }
}
