#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Diplomacy adapters.
//!
//! Renderers never read the world directly. They seed a [`Scene`] from a world
//! snapshot once and then replay the event stream produced by the world's
//! `apply` entry point, which keeps visuals and game state decoupled.

mod sprites;

use std::collections::BTreeMap;

use anyhow::Result as AnyResult;
use diplomacy_core::{Entity, EntityId, EntityKind, Event, Position, Team};
use glam::Vec2;
use thiserror::Error;

pub use sprites::SpriteManifest;

/// RGB color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
}

impl Color {
    /// Creates a color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    /// Highlight color drawn around the entities of `team` while it is active.
    #[must_use]
    pub const fn team_highlight(team: Team) -> Self {
        match team {
            Team::Red => Self::from_rgb_u8(0xff, 0x00, 0x00),
            Team::White => Self::from_rgb_u8(0xff, 0xff, 0xff),
            Team::Blue => Self::from_rgb_u8(0x00, 0x00, 0xff),
        }
    }
}

/// Visual asset associated with an entity kind and team.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SpriteKey {
    /// Piece owned by red.
    RedPiece,
    /// Piece owned by white.
    WhitePiece,
    /// Piece owned by blue.
    BluePiece,
    /// Tower owned by red.
    RedTower,
    /// Tower owned by white.
    WhiteTower,
    /// Tower owned by blue.
    BlueTower,
    /// Neutral tower.
    UnclaimedTower,
}

impl SpriteKey {
    /// Every sprite a renderer must be able to draw.
    pub const ALL: [SpriteKey; 7] = [
        SpriteKey::RedPiece,
        SpriteKey::WhitePiece,
        SpriteKey::BluePiece,
        SpriteKey::RedTower,
        SpriteKey::WhiteTower,
        SpriteKey::BlueTower,
        SpriteKey::UnclaimedTower,
    ];

    /// Sprite used to draw `entity`.
    #[must_use]
    pub const fn for_entity(entity: &Entity) -> Self {
        match (entity.kind(), entity.team()) {
            (EntityKind::Piece, Some(Team::Red)) => Self::RedPiece,
            (EntityKind::Piece, Some(Team::White)) => Self::WhitePiece,
            (EntityKind::Piece, Some(Team::Blue)) => Self::BluePiece,
            (EntityKind::Tower, Some(Team::Red)) => Self::RedTower,
            (EntityKind::Tower, Some(Team::White)) => Self::WhiteTower,
            (EntityKind::Tower, Some(Team::Blue)) => Self::BlueTower,
            _ => Self::UnclaimedTower,
        }
    }

    /// Name used for the sprite in manifests.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RedPiece => "red_piece",
            Self::WhitePiece => "white_piece",
            Self::BluePiece => "blue_piece",
            Self::RedTower => "red_tower",
            Self::WhiteTower => "white_tower",
            Self::BlueTower => "blue_tower",
            Self::UnclaimedTower => "unclaimed_tower",
        }
    }
}

/// Mapping between board cells and world-space coordinates.
///
/// Cell `(row, column)` spans from `extent * (column, row) / size` to the next
/// cell boundary, so the board always fills the provided extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardGeometry {
    size: u32,
    extent: Vec2,
}

impl BoardGeometry {
    /// Creates a geometry for a `size` × `size` board drawn over `extent`.
    ///
    /// Returns an error when the board has no cells or the extent has no area.
    pub fn new(size: u32, extent: Vec2) -> Result<Self, RenderingError> {
        if size == 0 {
            return Err(RenderingError::InvalidBoardSize { size });
        }
        if extent.x <= 0.0 || extent.y <= 0.0 || !extent.is_finite() {
            return Err(RenderingError::InvalidExtent {
                width: extent.x,
                height: extent.y,
            });
        }
        Ok(Self { size, extent })
    }

    /// Number of rows and columns.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Total size of the board in world units.
    #[must_use]
    pub const fn extent(&self) -> Vec2 {
        self.extent
    }

    /// Size of a single cell in world units.
    #[must_use]
    pub fn cell_extent(&self) -> Vec2 {
        self.extent / self.size as f32
    }

    /// Upper-left corner of `position` in world units.
    #[must_use]
    pub fn cell_origin(&self, position: Position) -> Vec2 {
        Vec2::new(
            self.extent.x * position.column() as f32 / self.size as f32,
            self.extent.y * position.row() as f32 / self.size as f32,
        )
    }

    /// Cell containing the world-space `point`.
    ///
    /// Returns `None` when the point lies outside the board.
    #[must_use]
    pub fn position_at(&self, point: Vec2) -> Option<Position> {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        if point.x >= self.extent.x || point.y >= self.extent.y {
            return None;
        }

        let last = self.size - 1;
        let row = ((point.y / self.extent.y * self.size as f32) as u32).min(last);
        let column = ((point.x / self.extent.x * self.size as f32) as u32).min(last);
        Some(Position::new(row, column))
    }
}

/// Pointer snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position expressed in world units.
    pub cursor_world_space: Option<Vec2>,
    /// Whether the primary button was clicked on this frame.
    pub primary_click: bool,
}

/// Entity drawn on a scene cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneEntity {
    /// Entity occupying the cell.
    pub entity: Entity,
    /// Sprite used to draw the entity.
    pub sprite: SpriteKey,
}

impl SceneEntity {
    /// Creates a scene entry for `entity`.
    #[must_use]
    pub const fn new(entity: Entity) -> Self {
        Self {
            entity,
            sprite: SpriteKey::for_entity(&entity),
        }
    }
}

/// Presentation model kept in sync with the world through its events.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    geometry: BoardGeometry,
    cells: BTreeMap<Position, SceneEntity>,
    active_team: Option<Team>,
    round: u32,
    selected: Option<EntityId>,
    pending: Option<Entity>,
}

impl Scene {
    /// Seeds a scene from a snapshot of the board.
    #[must_use]
    pub fn new<I>(geometry: BoardGeometry, entities: I, active_team: Option<Team>, round: u32) -> Self
    where
        I: IntoIterator<Item = (Position, Entity)>,
    {
        Self {
            geometry,
            cells: entities
                .into_iter()
                .map(|(position, entity)| (position, SceneEntity::new(entity)))
                .collect(),
            active_team,
            round,
            selected: None,
            pending: None,
        }
    }

    /// Replays world events onto the scene.
    pub fn apply(&mut self, events: &[Event]) {
        for event in events {
            match *event {
                Event::EntityPlaced { entity, position } => {
                    if self.pending.map(|pending| pending.id()) == Some(entity.id()) {
                        self.pending = None;
                    }
                    let _ = self.cells.insert(position, SceneEntity::new(entity));
                }
                Event::EntityRemoved { entity, position } => {
                    if self.occupant_id(position) == Some(entity.id()) {
                        let _ = self.cells.remove(&position);
                    }
                }
                Event::EntityMoved { entity, from, to } => {
                    if self.occupant_id(from) == Some(entity.id()) {
                        let _ = self.cells.remove(&from);
                    }
                    let _ = self.cells.insert(to, SceneEntity::new(entity));
                }
                Event::TurnAdvanced { team, round, .. } => {
                    self.active_team = Some(team);
                    self.round = round;
                }
                Event::EntitySelected { entity } => self.selected = Some(entity.id()),
                Event::SelectionCleared { entity } => {
                    if self.selected == Some(entity.id()) {
                        self.selected = None;
                    }
                }
                Event::PlacementQueued { entity } => self.pending = Some(entity),
                Event::PlacementDiscarded { entity } => {
                    if self.pending.map(|pending| pending.id()) == Some(entity.id()) {
                        self.pending = None;
                    }
                }
                Event::TowerClaimed { .. } => {}
            }
        }
    }

    /// Geometry used to lay out the board.
    #[must_use]
    pub const fn geometry(&self) -> &BoardGeometry {
        &self.geometry
    }

    /// Board cell under the cursor of `input`.
    ///
    /// Returns `None` when the frame has no cursor or it lies off the board.
    #[must_use]
    pub fn cursor_cell(&self, input: &FrameInput) -> Option<Position> {
        input
            .cursor_world_space
            .and_then(|point| self.geometry.position_at(point))
    }

    /// Entity drawn at `position`, if any.
    #[must_use]
    pub fn entity_at(&self, position: Position) -> Option<&SceneEntity> {
        self.cells.get(&position)
    }

    /// Iterator over drawn entities in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &SceneEntity)> {
        self.cells.iter().map(|(position, entity)| (*position, entity))
    }

    /// Team whose entities are highlighted.
    #[must_use]
    pub const fn active_team(&self) -> Option<Team> {
        self.active_team
    }

    /// Number of completed rounds.
    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    /// Piece following the pointer until it is placed.
    #[must_use]
    pub const fn pending(&self) -> Option<Entity> {
        self.pending
    }

    /// Reports whether the entity at `position` belongs to the active team.
    #[must_use]
    pub fn is_highlighted(&self, position: Position) -> bool {
        match (self.cells.get(&position), self.active_team) {
            (Some(scene_entity), Some(team)) => scene_entity.entity.is_owned_by(team),
            _ => false,
        }
    }

    /// Reports whether the entity at `position` is selected.
    #[must_use]
    pub fn is_selected(&self, position: Position) -> bool {
        self.selected.is_some() && self.occupant_id(position) == self.selected
    }

    fn occupant_id(&self, position: Position) -> Option<EntityId> {
        self.cells.get(&position).map(|entry| entry.entity.id())
    }
}

/// Rendering backend capable of presenting Diplomacy scenes.
pub trait RenderingBackend {
    /// Presents the current state of `scene`.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Boards must contain at least one cell.
    #[error("board size must be positive (received {size})")]
    InvalidBoardSize {
        /// Provided board size that failed validation.
        size: u32,
    },
    /// The board must cover a positive, finite area.
    #[error("board extent must be positive (received {width}x{height})")]
    InvalidExtent {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}
