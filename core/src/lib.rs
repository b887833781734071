#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Diplomacy engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing the click a player performed, the world resolves those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values that
//! renderers replay to keep their presentation in sync. No presentation state
//! lives here: entities are described by kind and team only.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Diplomacy.";

/// Side length of the board used when no configuration is supplied.
pub const DEFAULT_BOARD_SIZE: u32 = 8;

/// Smallest board that fits the three starting corners without overlap.
pub const MIN_BOARD_SIZE: u32 = 4;

/// Largest board a game may be configured with.
pub const MAX_BOARD_SIZE: u32 = 256;

/// Teams competing for the board, listed in turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Team {
    /// Opens every round.
    Red,
    /// Plays after red.
    White,
    /// Closes every round.
    Blue,
}

impl Team {
    /// All teams in the order they take turns.
    pub const ALL: [Team; 3] = [Team::Red, Team::White, Team::Blue];

    /// Team that plays after `self`, wrapping from blue back to red.
    #[must_use]
    pub const fn successor(self) -> Self {
        match self {
            Self::Red => Self::White,
            Self::White => Self::Blue,
            Self::Blue => Self::Red,
        }
    }

    /// Lower-case name used by adapters and asset manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::White => "white",
            Self::Blue => "blue",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kinds of objects that can occupy a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// Mobile unit that moves and captures.
    Piece,
    /// Team stronghold; moving it leaves an unclaimed tower behind.
    Tower,
    /// Neutral tower waiting to be claimed by a pending piece.
    UnclaimedTower,
}

/// Unique identifier assigned to an entity by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier that follows `self` in allocation order.
    ///
    /// Returns `None` once the identifier space is exhausted, so handles are
    /// never reused.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

/// Game object placed on the board or waiting to be placed.
///
/// Identity is carried by [`EntityId`]; two pieces of the same team are
/// distinct entities. The constructors guarantee that pieces and towers always
/// carry an owning team while unclaimed towers never do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    team: Option<Team>,
}

impl Entity {
    /// Creates a piece owned by `team`.
    #[must_use]
    pub const fn piece(id: EntityId, team: Team) -> Self {
        Self {
            id,
            kind: EntityKind::Piece,
            team: Some(team),
        }
    }

    /// Creates a tower owned by `team`.
    #[must_use]
    pub const fn tower(id: EntityId, team: Team) -> Self {
        Self {
            id,
            kind: EntityKind::Tower,
            team: Some(team),
        }
    }

    /// Creates a neutral tower.
    #[must_use]
    pub const fn unclaimed_tower(id: EntityId) -> Self {
        Self {
            id,
            kind: EntityKind::UnclaimedTower,
            team: None,
        }
    }

    /// Identifier allocated to the entity.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Kind of the entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Owning team, absent for unclaimed towers.
    #[must_use]
    pub const fn team(&self) -> Option<Team> {
        self.team
    }

    /// Reports whether the entity belongs to `team`.
    #[must_use]
    pub fn is_owned_by(&self, team: Team) -> bool {
        self.team == Some(team)
    }
}

/// Location of a single board cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    row: u32,
    column: u32,
}

impl Position {
    /// Creates a new board position.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Commands that express every click the world knows how to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// The active player clicked an entity that occupies a cell.
    ClickEntity {
        /// Identifier of the clicked entity.
        entity: EntityId,
    },
    /// The active player clicked an empty cell.
    ClickCell {
        /// Cell that received the click.
        position: Position,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// An entity that was not on the board now occupies a cell.
    EntityPlaced {
        /// Entity that was placed.
        entity: Entity,
        /// Cell the entity occupies.
        position: Position,
    },
    /// An entity was overwritten and dropped from the board.
    EntityRemoved {
        /// Entity that left the board.
        entity: Entity,
        /// Cell the entity occupied.
        position: Position,
    },
    /// An entity moved between two cells.
    EntityMoved {
        /// Entity that moved.
        entity: Entity,
        /// Cell the entity occupied before moving.
        from: Position,
        /// Cell the entity occupies after moving.
        to: Position,
    },
    /// Another team became active.
    TurnAdvanced {
        /// Team that was active before the advance, if any.
        previous: Option<Team>,
        /// Team that is now active.
        team: Team,
        /// Number of completed rounds.
        round: u32,
    },
    /// A pending piece was spent to claim an unclaimed tower.
    TowerClaimed {
        /// Cell holding the newly claimed tower.
        position: Position,
        /// Team that now owns the tower.
        team: Team,
    },
    /// The active team selected one of its entities.
    EntitySelected {
        /// Entity that became selected.
        entity: Entity,
    },
    /// The selection was released.
    SelectionCleared {
        /// Entity that was selected.
        entity: Entity,
    },
    /// A fresh piece waits to be placed by the active team.
    PlacementQueued {
        /// Piece awaiting placement.
        entity: Entity,
    },
    /// A pending piece left the game without being placed.
    PlacementDiscarded {
        /// Piece that was discarded.
        entity: Entity,
    },
}

/// Failures reported by the board storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GridError {
    /// The requested position lies outside the board.
    #[error("position {position} lies outside the {size}x{size} board")]
    OutOfBounds {
        /// Position that failed validation.
        position: Position,
        /// Side length of the board.
        size: u32,
    },
}

/// Failures reported while resolving a command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// The command referenced an entity that is not on the board.
    #[error("entity {} is not on the board", .entity.get())]
    UnknownEntity {
        /// Identifier supplied by the command.
        entity: EntityId,
    },
    /// The board rejected the requested position.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Every entity identifier has been handed out.
    #[error("no entity identifiers left to allocate")]
    EntityIdsExhausted,
}

#[cfg(test)]
mod tests {
    use super::{Entity, EntityId, EntityKind, Event, GridError, Position, Team};

    #[test]
    fn team_successor_cycles_through_all_teams() {
        assert_eq!(Team::Red.successor(), Team::White);
        assert_eq!(Team::White.successor(), Team::Blue);
        assert_eq!(Team::Blue.successor(), Team::Red);
    }

    #[test]
    fn team_order_matches_successor_chain() {
        for window in Team::ALL.windows(2) {
            assert_eq!(window[0].successor(), window[1]);
        }
    }

    #[test]
    fn unclaimed_tower_has_no_team() {
        let tower = Entity::unclaimed_tower(EntityId::new(3));
        assert_eq!(tower.kind(), EntityKind::UnclaimedTower);
        assert_eq!(tower.team(), None);
        assert!(Team::ALL.iter().all(|team| !tower.is_owned_by(*team)));
    }

    #[test]
    fn pieces_with_same_team_are_distinct() {
        let first = Entity::piece(EntityId::new(1), Team::Blue);
        let second = Entity::piece(EntityId::new(2), Team::Blue);
        assert_ne!(first, second);
        assert!(first.is_owned_by(Team::Blue));
    }

    #[test]
    fn entity_ids_are_never_reused() {
        assert_eq!(EntityId::new(7).next(), Some(EntityId::new(8)));
        assert_eq!(EntityId::new(u32::MAX).next(), None);
    }

    #[test]
    fn positions_order_row_major() {
        assert!(Position::new(0, 7) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn out_of_bounds_error_mentions_position() {
        let error = GridError::OutOfBounds {
            position: Position::new(9, 2),
            size: 8,
        };
        assert_eq!(
            error.to_string(),
            "position (9, 2) lies outside the 8x8 board"
        );
    }

    #[test]
    fn event_round_trips_through_bincode() {
        let event = Event::EntityMoved {
            entity: Entity::tower(EntityId::new(4), Team::White),
            from: Position::new(7, 0),
            to: Position::new(6, 1),
        };
        let bytes = bincode::serialize(&event).expect("serialize");
        let restored: Event = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, event);
    }
}
