//! Integration test: adding and removing members of an active group.

mod common;

use common::{party, World};
use indexmap::IndexMap;
use muster_assign::PlacementTier;
use muster_core::{ActorId, GridOffset, ProviderError, TokenId};
use muster_party::{DisperseOptions, GroupPhase, LiveAgent, PartyError};

#[test]
fn joining_agent_remembers_its_cell() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    let newcomer = world.spawn(3, 5, 3);

    let roster = party.add_member(&mut world.host(), s, &newcomer).unwrap();
    assert_eq!(roster.len(), 3);
    assert_eq!(
        roster.member(TokenId(3)).unwrap().offset,
        Some(GridOffset::new(0, -2))
    );
    assert_eq!(roster.members[2].rank.order, 2);
    assert_eq!(world.cell_of(TokenId(3)), None);
    assert!(!world.store.busy(s));

    party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap();
    assert_eq!(world.restored_cell(TokenId(3)), Some((5, 3)));
}

#[test]
fn joining_a_turned_group_unrotates_the_offset() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    party.set_facing(&mut world.store, s, 90.0).unwrap();
    let newcomer = world.spawn(3, 7, 5);

    let roster = party.add_member(&mut world.host(), s, &newcomer).unwrap();
    assert_eq!(
        roster.member(TokenId(3)).unwrap().offset,
        Some(GridOffset::new(0, -2))
    );

    party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap();
    assert_eq!(world.restored_cell(TokenId(1)), Some((5, 4)));
    assert_eq!(world.restored_cell(TokenId(2)), Some((5, 6)));
    assert_eq!(world.restored_cell(TokenId(3)), Some((7, 5)));
}

#[test]
fn joining_a_diagonal_group_comes_back_to_its_cell() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 5, 5), world.spawn(3, 6, 5)];
    let draft: IndexMap<TokenId, GridOffset> = [
        (TokenId(1), GridOffset::ORIGIN),
        (TokenId(2), GridOffset::new(1, 0)),
        (TokenId(3), GridOffset::new(2, 0)),
    ]
    .into_iter()
    .collect();
    let mut party = party();
    let s = party
        .gather(&mut world.host(), &agents, Some(&draft))
        .unwrap()
        .surrogate;
    party.set_facing(&mut world.store, s, 45.0).unwrap();
    let newcomer = world.spawn(4, 7, 5);

    // Plain un-rotation gives (1,-1), which turns back onto member 2's
    // cell; (2,-1) is carried onto (2,0) by the rotation.
    let roster = party.add_member(&mut world.host(), s, &newcomer).unwrap();
    assert_eq!(
        roster.member(TokenId(4)).unwrap().offset,
        Some(GridOffset::new(2, -1))
    );

    let out = party
        .disperse(&mut world.host(), s, &DisperseOptions::default())
        .unwrap();
    assert_eq!(out.resolution.count(PlacementTier::Memory), 4);
    assert_eq!(world.restored_cell(TokenId(1)), Some((5, 5)));
    assert_eq!(world.restored_cell(TokenId(2)), Some((6, 6)));
    assert_eq!(world.restored_cell(TokenId(3)), Some((7, 6)));
    assert_eq!(world.restored_cell(TokenId(4)), Some((7, 5)));
}

#[test]
fn joining_on_a_claimed_cell_spirals_out() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    // Standing where member 2 will come back.
    let newcomer = world.spawn(3, 6, 5);

    let roster = party.add_member(&mut world.host(), s, &newcomer).unwrap();
    let offset = roster.member(TokenId(3)).unwrap().offset.unwrap();
    assert_ne!(offset, GridOffset::new(1, 0));
    assert_eq!((offset.dx - 1).abs().max(offset.dy.abs()), 1);
    roster.validate().unwrap();
}

#[test]
fn join_rejects_members_and_groups() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;

    let again = LiveAgent::new(TokenId(1), ActorId(1), world.scene.cell(2, 2));
    assert_eq!(
        party.add_member(&mut world.host(), s, &again).unwrap_err(),
        PartyError::DuplicateAgent { token: TokenId(1) }
    );
    let itself = LiveAgent::new(s, ActorId(1), world.scene.cell(5, 5));
    assert_eq!(
        party.add_member(&mut world.host(), s, &itself).unwrap_err(),
        PartyError::NestedSurrogate { token: s }
    );
}

#[test]
fn failed_join_restores_the_roster() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5)];
    let mut party = party();
    let gathered = party.gather(&mut world.host(), &agents, None).unwrap();
    let s = gathered.surrogate;
    let newcomer = world.spawn(3, 5, 3);
    world.life.fail_delete_for(TokenId(3));

    let err = party.add_member(&mut world.host(), s, &newcomer).unwrap_err();
    assert!(matches!(
        err,
        PartyError::Provider {
            context: "delete joining agent",
            source: ProviderError::Rejected { .. }
        }
    ));
    assert_eq!(world.store.get(s), Some(&gathered.roster));
    assert!(!world.store.busy(s));
}

#[test]
fn leaving_member_reappears_beside_the_group() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5), world.spawn(3, 5, 6)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;

    let out = party.remove_member(&mut world.host(), s, TokenId(2)).unwrap();
    assert!(out.dispersed.is_none());
    assert!(out.warnings.is_empty());
    let cell = world.cell_of(out.restored).unwrap();
    assert_ne!(cell, (5, 5));
    assert_eq!(cell, world.scene.cell_of(out.top_left));
    assert!((cell.0 - 5).abs() <= 1 && (cell.1 - 5).abs() <= 1);

    let roster = party.get_active_roster(&world.store, s).unwrap();
    assert_eq!(roster.len(), 2);
    assert!(roster.member(TokenId(2)).is_none());
    assert_eq!(roster.members[1].rank.order, 1);
    assert_eq!(party.phase(&world.store, s).unwrap(), GroupPhase::Gathered);
}

#[test]
fn last_pair_dissolves_on_removal() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;

    let out = party.remove_member(&mut world.host(), s, TokenId(1)).unwrap();
    let dispersed = out.dispersed.expect("survivor dispersed");
    assert_eq!(dispersed.restored.len(), 1);
    assert_eq!(world.restored_cell(TokenId(2)), Some((5, 5)));
    assert_ne!(world.cell_of(out.restored), Some((5, 5)));
    assert!(!world.is_group(s));
    assert_eq!(world.cell_of(s), None);
    assert_eq!(party.phase(&world.store, s).unwrap(), GroupPhase::Idle);
}

#[test]
fn removing_a_stranger_fails() {
    let mut world = World::open();
    let agents = vec![world.spawn(1, 4, 5), world.spawn(2, 6, 5)];
    let mut party = party();
    let s = party.gather(&mut world.host(), &agents, None).unwrap().surrogate;
    assert!(matches!(
        party.remove_member(&mut world.host(), s, TokenId(9)),
        Err(PartyError::Roster(_))
    ));
    assert_eq!(world.store.get(s).unwrap().len(), 2);
}
