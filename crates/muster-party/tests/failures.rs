//! Integration test: failure handling and rollback.
//!
//! Every rejected operation must leave the scene and the store exactly as
//! they were; partial collaborator failures become warnings.

mod common;

use common::{party, World};
use muster_core::{ActorId, ProviderError, RosterStore, TokenId};
use muster_party::{DisperseOptions, GroupPhase, LiveAgent, PartyError, PartyWarning};
use muster_test_utils::{GridScene, LifecycleEvent};

fn pair(world: &mut World) -> Vec<LiveAgent> {
    vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5)]
}

// ── Gather validation ────────────────────────────────────────────────

#[test]
fn gather_needs_two_agents() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5)];
    let err = party().gather(&mut world.host(), &agents, None).unwrap_err();
    assert_eq!(
        err,
        PartyError::TooFewAgents {
            given: 1,
            required: 2
        }
    );
    assert!(world.life.events().is_empty());
}

#[test]
fn gather_rejects_repeated_tokens() {
    let mut world = World::open();
    let a = world.spawn(1, 4, 5);
    let err = party()
        .gather(&mut world.host(), &[a.clone(), a], None)
        .unwrap_err();
    assert_eq!(err, PartyError::DuplicateAgent { token: TokenId(1) });
    assert!(world.life.events().is_empty());
}

#[test]
fn groups_cannot_be_nested() {
    let mut world = World::open();
    let agents = pair(&mut world);
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    let top_left = world.life.position(s).unwrap();
    let other = world.spawn(3, 8, 8);

    // Caught through the store even when the caller forgot the flag.
    let unflagged = LiveAgent::new(s, ActorId(1), top_left);
    let err = party
        .gather(&mut world.host(), &[unflagged, other.clone()], None)
        .unwrap_err();
    assert_eq!(err, PartyError::NestedSurrogate { token: s });

    let flagged = LiveAgent {
        surrogate: true,
        ..LiveAgent::new(TokenId(77), ActorId(77), top_left)
    };
    let err = party
        .gather(&mut world.host(), &[other, flagged], None)
        .unwrap_err();
    assert_eq!(err, PartyError::NestedSurrogate { token: TokenId(77) });
}

#[test]
fn failed_roster_save_removes_the_surrogate() {
    let mut world = World::open();
    let agents = pair(&mut world);
    world.store.fail_saves(true);
    let err = party().gather(&mut world.host(), &agents, None).unwrap_err();
    assert!(matches!(
        err,
        PartyError::Provider {
            context: "save roster",
            source: ProviderError::Storage { .. }
        }
    ));
    let created = world.life.created();
    assert_eq!(created.len(), 1);
    assert_eq!(world.cell_of(created[0]), None);
    assert_eq!(world.cell_of(TokenId(1)), Some((4, 5)));
    assert_eq!(world.cell_of(TokenId(2)), Some((6, 5)));
    assert!(world.store.is_empty());
}

// ── Dispersal rollback ───────────────────────────────────────────────

#[test]
fn sealed_anchor_rolls_back() {
    let mut world = World::new(GridScene::new(common::CELL, 11, 11).with_walled_box(5, 5, 1, 1));
    let agents = vec![
        world.spawn(1, 3, 5),
        world.spawn(2, 7, 5),
        world.spawn(3, 5, 3),
        world.spawn(4, 5, 7),
        world.spawn(5, 5, 5),
    ];
    let mut party = party();
    let gathered = party.gather(&mut world.host(), &agents, None).unwrap();
    let s = gathered.surrogate;
    assert_eq!(world.cell_of(s), Some((5, 5)));
    let events_before = world.life.events().len();

    let err = party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        PartyError::Infeasible {
            unplaced: 4,
            total: 5
        }
    );
    assert_eq!(world.life.events().len(), events_before);
    assert_eq!(world.cell_of(s), Some((5, 5)));
    assert_eq!(world.store.get(s), Some(&gathered.roster));
    assert!(!world.store.busy(s));
    assert_eq!(party.phase(&world.store, s).unwrap(), GroupPhase::Gathered);

    // Scatter obeys the same rule.
    let err = party.emergency_scatter(&mut world.host(), s).unwrap_err();
    assert!(matches!(err, PartyError::Infeasible { .. }));
    assert!(world.is_group(s));
}

#[test]
fn cramped_space_stacks_a_minority() {
    let mut world = World::new(GridScene::new(common::CELL, 11, 11).with_walled_box(5, 5, 2, 1));
    let agents = vec![world.spawn(1, 5, 5), world.spawn(2, 6, 5), world.spawn(3, 5, 4)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    let out = party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap();
    assert_eq!(out.resolution.stacked_count(), 1);
    assert!(out.warnings.contains(&PartyWarning::Stacked { count: 1 }));
    assert_eq!(world.restored_cell(TokenId(3)), Some((5, 5)));
    assert!(!world.is_group(s));
}

#[test]
fn unknown_group_is_rejected() {
    let mut world = World::open();
    let err = party()
        .disperse(&mut world.host(), TokenId(404), &DisperseOptions::default())
        .unwrap_err();
    assert_eq!(err, PartyError::NotASurrogate { token: TokenId(404) });
}

// ── Collaborator failures ────────────────────────────────────────────

#[test]
fn stale_busy_flag_is_recovered() {
    let mut world = World::open();
    let agents = pair(&mut world);
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    world.store.set_busy(s, true).unwrap();

    let out = party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap();
    assert!(out
        .warnings
        .contains(&PartyWarning::StaleBusyFlag { surrogate: s }));
    assert_eq!(out.restored.len(), 2);
    assert!(!world.store.busy(s));
}

#[test]
fn one_failed_create_is_a_warning() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 5, 5), world.spawn(3, 6, 5)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    world.life.fail_create_for(ActorId(2));

    let out = party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap();
    assert_eq!(out.restored.len(), 2);
    assert!(out.replacement(TokenId(2)).is_none());
    assert!(out
        .warnings
        .iter()
        .any(|w| matches!(w, PartyWarning::CreateFailed { token, .. } if *token == TokenId(2))));
    assert_eq!(world.restored_cell(TokenId(1)), Some((4, 5)));
    assert_eq!(world.restored_cell(TokenId(3)), Some((6, 5)));
    assert_eq!(world.cell_of(s), None);
}

#[test]
fn no_member_restored_keeps_the_group() {
    let mut world = World::open();
    let agents = pair(&mut world);
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    world.life.fail_create_for(ActorId(1));
    world.life.fail_create_for(ActorId(2));

    let err = party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PartyError::Provider {
            context: "restore members",
            ..
        }
    ));
    assert_eq!(world.cell_of(s), Some((5, 5)));
    assert!(world.is_group(s));
    assert!(!world.store.busy(s));
}

#[test]
fn failed_surrogate_delete_clears_busy_flag() {
    let mut world = World::open();
    let agents = pair(&mut world);
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    world.life.fail_delete_for(s);

    let err = party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PartyError::Provider {
            context: "delete surrogate",
            source: ProviderError::Rejected { .. }
        }
    ));
    assert!(!world.store.busy(s));
    assert!(world.is_group(s));
    assert!(world.life.restored(TokenId(1)).is_some());
    assert!(!world
        .life
        .events()
        .contains(&LifecycleEvent::Deleted { token: s }));
}

#[test]
fn failed_original_delete_is_a_warning() {
    let mut world = World::open();
    let agents = pair(&mut world);
    world.life.fail_delete_for(TokenId(2));
    let out = party().gather(&mut world.host(), &agents, None).unwrap();
    assert_eq!(out.warnings.len(), 1);
    assert!(matches!(
        out.warnings[0],
        PartyWarning::DeleteFailed { token, .. } if token == TokenId(2)
    ));
    assert!(world.is_group(out.surrogate));
}
