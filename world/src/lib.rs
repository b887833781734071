#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Diplomacy.
//!
//! The [`World`] owns the board, the turn order, the current selection and the
//! piece awaiting placement. Every mutation goes through [`apply`], which
//! resolves a single click and reports what changed as [`Event`] values.

mod config;
mod grid;
mod selection;
mod turns;

use diplomacy_core::{
    Command, Entity, EntityId, EntityKind, Event, GridError, InteractionError, Position, Team,
    WELCOME_BANNER,
};
use tracing::{debug, trace, warn};

pub use config::{ConfigError, GameConfig};
pub use grid::{GridStore, Placement};
pub use selection::{PendingPlacement, SelectionState};
pub use turns::{TurnChange, TurnCycle};

/// Represents the authoritative Diplomacy world state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    grid: GridStore,
    turns: TurnCycle,
    selection: SelectionState,
    pending: PendingPlacement,
    next_entity_id: Option<EntityId>,
}

/// Most identifiers a single command can allocate: a tower capture spends two
/// and the turn it ends may queue one more piece.
const IDS_PER_COMMAND: u64 = 3;

impl World {
    /// Creates a new game on the default board with red to move.
    #[must_use]
    pub fn new() -> Self {
        Self::seeded(GameConfig::default())
    }

    /// Creates a new game using the provided configuration.
    pub fn with_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::seeded(*config))
    }

    fn seeded(config: GameConfig) -> Self {
        let mut world = Self {
            banner: WELCOME_BANNER,
            grid: GridStore::new(config.board_size),
            turns: TurnCycle::new(),
            selection: SelectionState::new(),
            pending: PendingPlacement::new(),
            next_entity_id: Some(EntityId::new(0)),
        };
        let mut ignored = Vec::new();
        let started = world
            .seed_starting_layout()
            .and_then(|()| world.advance_turn(&mut ignored));
        if let Err(error) = started {
            warn!(%error, "starting layout could not be allocated");
        }
        world
    }

    fn seed_starting_layout(&mut self) -> Result<(), InteractionError> {
        let last = self.grid.size().saturating_sub(1);
        let inner = self.grid.size().saturating_sub(2);
        let corners = [
            (
                Team::Blue,
                Position::new(0, 0),
                [Position::new(0, 1), Position::new(1, 0)],
            ),
            (
                Team::White,
                Position::new(last, 0),
                [Position::new(inner, 0), Position::new(last, 1)],
            ),
            (
                Team::Red,
                Position::new(last, last),
                [Position::new(inner, last), Position::new(last, inner)],
            ),
        ];

        for (team, tower, pieces) in corners {
            let entity = Entity::tower(self.allocate_id()?, team);
            self.seed(entity, tower);
            for cell in pieces {
                let entity = Entity::piece(self.allocate_id()?, team);
                self.seed(entity, cell);
            }
        }
        Ok(())
    }

    fn seed(&mut self, entity: Entity, position: Position) {
        if let Err(error) = self.grid.place(entity, position) {
            warn!(%error, "starting entity does not fit on the board");
        }
    }

    fn allocate_id(&mut self) -> Result<EntityId, InteractionError> {
        let id = self
            .next_entity_id
            .ok_or(InteractionError::EntityIdsExhausted)?;
        self.next_entity_id = id.next();
        Ok(id)
    }

    fn ids_remaining(&self) -> u64 {
        self.next_entity_id
            .map_or(0, |id| u64::from(u32::MAX - id.get()) + 1)
    }

    fn place(
        &mut self,
        entity: Entity,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GridError> {
        let placement = self.grid.place(entity, position)?;
        if let Some(displaced) = placement.displaced {
            out_events.push(Event::EntityRemoved {
                entity: displaced,
                position,
            });
        }
        match placement.origin {
            Some(from) if from == position => {}
            Some(from) => out_events.push(Event::EntityMoved {
                entity,
                from,
                to: position,
            }),
            None => out_events.push(Event::EntityPlaced { entity, position }),
        }
        Ok(())
    }

    fn clear_selection(&mut self, out_events: &mut Vec<Event>) {
        if let Some(entity) = self.selection.clear() {
            out_events.push(Event::SelectionCleared { entity });
        }
    }

    fn advance_turn(&mut self, out_events: &mut Vec<Event>) -> Result<(), InteractionError> {
        let change = self.turns.advance();
        out_events.push(Event::TurnAdvanced {
            previous: change.previous,
            team: change.team,
            round: change.round,
        });

        if !self.turns.placement_phase_active() {
            return Ok(());
        }

        let piece = Entity::piece(self.allocate_id()?, change.team);
        if let Some(discarded) = self.pending.set(piece) {
            warn!(
                entity = discarded.id().get(),
                "pending placement overwritten before it was placed"
            );
            out_events.push(Event::PlacementDiscarded { entity: discarded });
        }
        out_events.push(Event::PlacementQueued { entity: piece });
        Ok(())
    }

    fn click_entity(
        &mut self,
        id: EntityId,
        out_events: &mut Vec<Event>,
    ) -> Result<(), InteractionError> {
        let position = self
            .grid
            .position_of(id)
            .ok_or(InteractionError::UnknownEntity { entity: id })?;
        let target = self
            .grid
            .entity_at(position)
            .ok_or(InteractionError::UnknownEntity { entity: id })?;

        if self.pending.is_pending() {
            if target.kind() != EntityKind::UnclaimedTower {
                debug!(%position, "ignoring click on claimed entity while a piece is pending");
                return Ok(());
            }
            return self.claim_tower(position, out_events);
        }

        if self.selection.is_selected(target) {
            self.clear_selection(out_events);
            return Ok(());
        }

        if let Some(selected) = self.selection.current() {
            return self.commit_selection(selected, position, out_events);
        }

        match self.turns.current_team() {
            Some(team) if target.is_owned_by(team) => {
                if let Some(replaced) = self.selection.select(target) {
                    out_events.push(Event::SelectionCleared { entity: replaced });
                }
                out_events.push(Event::EntitySelected { entity: target });
            }
            _ => debug!(%position, "ignoring click on entity owned by another team"),
        }
        Ok(())
    }

    fn click_cell(
        &mut self,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), InteractionError> {
        if !self.grid.in_bounds(position) {
            return Err(GridError::OutOfBounds {
                position,
                size: self.grid.size(),
            }
            .into());
        }

        if self.grid.entity_at(position).is_some() {
            debug!(%position, "ignoring cell click on occupied position");
            return Ok(());
        }

        if let Some(pending) = self.pending.take() {
            self.place(pending, position, out_events)?;
            return Ok(());
        }

        if let Some(selected) = self.selection.current() {
            return self.commit_selection(selected, position, out_events);
        }

        debug!(%position, "ignoring cell click without selection");
        Ok(())
    }

    fn claim_tower(
        &mut self,
        position: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), InteractionError> {
        let Some((pending, team)) = self
            .pending
            .take()
            .and_then(|pending| pending.team().map(|team| (pending, team)))
        else {
            return Ok(());
        };

        let tower = Entity::tower(self.allocate_id()?, team);
        self.place(tower, position, out_events)?;
        out_events.push(Event::PlacementDiscarded { entity: pending });
        out_events.push(Event::TowerClaimed { position, team });
        Ok(())
    }

    fn commit_selection(
        &mut self,
        selected: Entity,
        destination: Position,
        out_events: &mut Vec<Event>,
    ) -> Result<(), InteractionError> {
        let origin =
            self.grid
                .position_of(selected.id())
                .ok_or(InteractionError::UnknownEntity {
                    entity: selected.id(),
                })?;

        match (selected.kind(), selected.team()) {
            (EntityKind::Tower, Some(team)) => {
                let abandoned = Entity::unclaimed_tower(self.allocate_id()?);
                let piece = Entity::piece(self.allocate_id()?, team);
                self.place(abandoned, origin, out_events)?;
                self.place(piece, destination, out_events)?;
            }
            _ => self.place(selected, destination, out_events)?,
        }

        self.clear_selection(out_events);
        self.advance_turn(out_events)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Clicks without an applicable rule leave the world untouched and emit no
/// events. Errors are reported before any mutation takes place.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), InteractionError> {
    trace!(?command, "resolving command");
    if world.ids_remaining() < IDS_PER_COMMAND {
        return Err(InteractionError::EntityIdsExhausted);
    }
    match command {
        Command::ClickEntity { entity } => world.click_entity(entity, out_events),
        Command::ClickCell { position } => world.click_cell(position, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use diplomacy_core::{Entity, EntityId, Position, Team};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Side length of the board.
    #[must_use]
    pub fn board_size(world: &World) -> u32 {
        world.grid.size()
    }

    /// Entity occupying `position`, if any.
    #[must_use]
    pub fn entity_at(world: &World, position: Position) -> Option<Entity> {
        world.grid.entity_at(position)
    }

    /// Cell occupied by the entity with `id`, if it is on the board.
    #[must_use]
    pub fn position_of(world: &World, id: EntityId) -> Option<Position> {
        world.grid.position_of(id)
    }

    /// Captures a read-only view of every entity on the board.
    #[must_use]
    pub fn entity_view(world: &World) -> EntityView {
        EntityView {
            snapshots: world
                .grid
                .iter()
                .map(|(position, entity)| EntitySnapshot { position, entity })
                .collect(),
        }
    }

    /// Team whose turn it is.
    #[must_use]
    pub fn current_team(world: &World) -> Option<Team> {
        world.turns.current_team()
    }

    /// Number of completed rounds.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.turns.round()
    }

    /// Whether each turn starts with a piece to place.
    #[must_use]
    pub fn placement_phase_active(world: &World) -> bool {
        world.turns.placement_phase_active()
    }

    /// Entity selected by the active team.
    #[must_use]
    pub fn selected(world: &World) -> Option<Entity> {
        world.selection.current()
    }

    /// Piece waiting to be placed by the active team.
    #[must_use]
    pub fn pending(world: &World) -> Option<Entity> {
        world.pending.current()
    }

    /// Read-only snapshot describing all entities placed on the board.
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct EntityView {
        snapshots: Vec<EntitySnapshot>,
    }

    impl EntityView {
        /// Iterator over the captured snapshots in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
            self.snapshots.iter()
        }

        /// Number of entities on the board.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether the board is empty.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EntitySnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a placed entity.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EntitySnapshot {
        /// Cell occupied by the entity.
        pub position: Position,
        /// Entity occupying the cell.
        pub entity: Entity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn click_cell(world: &mut World, row: u32, column: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::ClickCell {
                position: Position::new(row, column),
            },
            &mut events,
        )
        .expect("cell click resolves");
        events
    }

    fn click_entity_at(world: &mut World, row: u32, column: u32) -> Vec<Event> {
        let entity = query::entity_at(world, Position::new(row, column)).expect("occupied cell");
        let mut events = Vec::new();
        apply(
            world,
            Command::ClickEntity {
                entity: entity.id(),
            },
            &mut events,
        )
        .expect("entity click resolves");
        events
    }

    #[test]
    fn new_world_starts_with_red_and_nine_entities() {
        let world = World::new();

        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::board_size(&world), 8);
        assert_eq!(query::current_team(&world), Some(Team::Red));
        assert_eq!(query::round(&world), 0);
        assert!(!query::placement_phase_active(&world));
        assert_eq!(query::entity_view(&world).len(), 9);
        assert_eq!(query::pending(&world), None);
        assert_eq!(query::selected(&world), None);
    }

    #[test]
    fn with_config_rejects_small_boards() {
        let result = World::with_config(&GameConfig { board_size: 3 });
        assert!(matches!(
            result,
            Err(ConfigError::BoardTooSmall { size: 3, .. })
        ));
    }

    #[test]
    fn minimum_board_hosts_all_starting_entities() {
        let world = World::with_config(&GameConfig { board_size: 4 }).expect("valid config");
        assert_eq!(query::entity_view(&world).len(), 9);
    }

    #[test]
    fn selecting_and_moving_emits_events_in_mutation_order() {
        let mut world = World::new();
        let piece = query::entity_at(&world, Position::new(6, 7)).expect("red piece");

        let selected = click_entity_at(&mut world, 6, 7);
        assert_eq!(selected, vec![Event::EntitySelected { entity: piece }]);

        let moved = click_cell(&mut world, 5, 7);
        assert_eq!(
            moved,
            vec![
                Event::EntityMoved {
                    entity: piece,
                    from: Position::new(6, 7),
                    to: Position::new(5, 7),
                },
                Event::SelectionCleared { entity: piece },
                Event::TurnAdvanced {
                    previous: Some(Team::Red),
                    team: Team::White,
                    round: 0,
                },
            ]
        );
    }

    #[test]
    fn unknown_entity_is_rejected_without_mutation() {
        let mut world = World::new();
        let mut events = Vec::new();

        let result = apply(
            &mut world,
            Command::ClickEntity {
                entity: EntityId::new(999),
            },
            &mut events,
        );

        assert_eq!(
            result,
            Err(InteractionError::UnknownEntity {
                entity: EntityId::new(999),
            })
        );
        assert!(events.is_empty());
    }

    #[test]
    fn out_of_bounds_cell_click_is_rejected_before_mutation() {
        let mut world = World::new();
        let _ = click_entity_at(&mut world, 6, 7);
        let mut events = Vec::new();

        let result = apply(
            &mut world,
            Command::ClickCell {
                position: Position::new(8, 7),
            },
            &mut events,
        );

        assert_eq!(
            result,
            Err(InteractionError::Grid(GridError::OutOfBounds {
                position: Position::new(8, 7),
                size: 8,
            }))
        );
        assert!(events.is_empty());
        assert!(query::selected(&world).is_some(), "selection must survive");
        assert_eq!(query::current_team(&world), Some(Team::Red));
    }

    #[test]
    fn exhausted_identifiers_reject_commands_before_mutation() {
        let mut world = World::new();
        world.next_entity_id = Some(EntityId::new(u32::MAX - 1));
        let piece = query::entity_at(&world, Position::new(6, 7)).expect("red piece");
        let mut events = Vec::new();

        let result = apply(
            &mut world,
            Command::ClickEntity { entity: piece.id() },
            &mut events,
        );

        assert_eq!(result, Err(InteractionError::EntityIdsExhausted));
        assert!(events.is_empty());
        assert_eq!(query::selected(&world), None);
    }

    #[test]
    fn last_identifiers_are_still_allocated() {
        let mut world = World::new();
        world.next_entity_id = Some(EntityId::new(u32::MAX - 2));
        let _ = click_entity_at(&mut world, 7, 7);

        let _ = click_cell(&mut world, 5, 5);

        let spawned = query::entity_at(&world, Position::new(5, 5)).expect("spawned piece");
        assert_eq!(spawned.id(), EntityId::new(u32::MAX - 1));
        assert_eq!(world.next_entity_id, Some(EntityId::new(u32::MAX)));
    }

    #[test]
    fn cell_click_on_occupied_position_is_ignored() {
        let mut world = World::new();
        let _ = click_entity_at(&mut world, 6, 7);

        let events = click_cell(&mut world, 7, 6);

        assert!(events.is_empty());
        assert_eq!(query::current_team(&world), Some(Team::Red));
    }

    #[test]
    fn tower_move_leaves_unclaimed_tower_and_spawns_piece() {
        let mut world = World::new();
        let tower = query::entity_at(&world, Position::new(7, 7)).expect("red tower");
        let _ = click_entity_at(&mut world, 7, 7);

        let events = click_cell(&mut world, 5, 5);

        let abandoned = query::entity_at(&world, Position::new(7, 7)).expect("abandoned cell");
        let spawned = query::entity_at(&world, Position::new(5, 5)).expect("spawned piece");
        assert_eq!(abandoned.kind(), EntityKind::UnclaimedTower);
        assert_eq!(spawned.kind(), EntityKind::Piece);
        assert_eq!(spawned.team(), Some(Team::Red));
        assert_eq!(
            &events[..3],
            &[
                Event::EntityRemoved {
                    entity: tower,
                    position: Position::new(7, 7),
                },
                Event::EntityPlaced {
                    entity: abandoned,
                    position: Position::new(7, 7),
                },
                Event::EntityPlaced {
                    entity: spawned,
                    position: Position::new(5, 5),
                },
            ]
        );
        assert!(events.contains(&Event::SelectionCleared { entity: tower }));
        assert_eq!(query::current_team(&world), Some(Team::White));
    }
}
