//! Property-based tests for the interaction resolver.
//!
//! Random click sequences are routed the way an input mapper would route them:
//! occupied cells produce entity clicks, empty cells produce cell clicks.

use std::collections::HashSet;

use diplomacy_core::{Command, Event, Position, Team};
use diplomacy_world::{self as world, query, GameConfig, World};
use proptest::prelude::*;

fn command_for(world: &World, position: Position) -> Command {
    match query::entity_at(world, position) {
        Some(entity) => Command::ClickEntity {
            entity: entity.id(),
        },
        None => Command::ClickCell { position },
    }
}

fn assert_invariants(world: &World) -> Result<(), TestCaseError> {
    let view = query::entity_view(world);
    let mut ids = HashSet::new();
    let mut positions = HashSet::new();
    for snapshot in view.iter() {
        prop_assert!(
            ids.insert(snapshot.entity.id()),
            "entity {:?} reachable from two cells",
            snapshot.entity.id()
        );
        prop_assert!(positions.insert(snapshot.position));
        prop_assert_eq!(
            query::position_of(world, snapshot.entity.id()),
            Some(snapshot.position)
        );
    }

    if let Some(pending) = query::pending(world) {
        prop_assert!(query::placement_phase_active(world));
        prop_assert!(
            !ids.contains(&pending.id()),
            "pending piece must not be on the board"
        );
        prop_assert_eq!(pending.team(), query::current_team(world));
    }

    if let Some(selected) = query::selected(world) {
        let team = query::current_team(world);
        prop_assert!(team.is_some_and(|team| selected.is_owned_by(team)));
        prop_assert!(ids.contains(&selected.id()));
        prop_assert!(query::pending(world).is_none());
    }

    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Board exclusivity, selection ownership and pending isolation hold after every click.
    #[test]
    fn prop_invariants_hold_for_random_clicks(
        board_size in 4u32..10,
        clicks in prop::collection::vec((0u32..10, 0u32..10), 0..200)
    ) {
        let mut world = World::with_config(&GameConfig { board_size }).unwrap();

        for (row, column) in clicks {
            let position = Position::new(row % board_size, column % board_size);
            let command = command_for(&world, position);
            let mut events = Vec::new();
            world::apply(&mut world, command, &mut events).unwrap();
            assert_invariants(&world)?;
        }
    }

    /// Turns always pass to the successor and rounds only grow when red starts again.
    #[test]
    fn prop_turn_order_is_cyclic(
        clicks in prop::collection::vec((0u32..8, 0u32..8), 0..300)
    ) {
        let mut world = World::new();
        let mut round = query::round(&world);
        let mut team = query::current_team(&world);
        prop_assert_eq!(team, Some(Team::Red));

        for (row, column) in clicks {
            let command = command_for(&world, Position::new(row, column));
            let mut events = Vec::new();
            world::apply(&mut world, command, &mut events).unwrap();

            for event in events {
                if let Event::TurnAdvanced { previous, team: next, round: next_round } = event {
                    prop_assert_eq!(previous, team);
                    prop_assert_eq!(team.map(Team::successor), Some(next));
                    let expected_round = if next == Team::Red { round + 1 } else { round };
                    prop_assert_eq!(next_round, expected_round);
                    team = Some(next);
                    round = next_round;
                }
            }

            prop_assert_eq!(query::current_team(&world), team);
            prop_assert_eq!(query::round(&world), round);
            prop_assert_eq!(query::placement_phase_active(&world), round > 0);
        }
    }
}
