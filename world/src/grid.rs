//! Dense board storage that binds entities to cells.

use diplomacy_core::{Entity, EntityId, GridError, Position, MAX_BOARD_SIZE};

/// Outcome of binding an entity to a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Entity that previously occupied the target cell and was dropped.
    pub displaced: Option<Entity>,
    /// Cell the placed entity occupied before the call, if it was on the board.
    pub origin: Option<Position>,
}

/// Fixed-size square grid holding at most one entity per cell.
///
/// An entity id is never bound to more than one cell: placing an entity that
/// is already on the board vacates its previous cell first.
#[derive(Clone, Debug)]
pub struct GridStore {
    size: u32,
    cells: Vec<Option<Entity>>,
}

impl GridStore {
    /// Creates an empty grid with `size` rows and columns.
    ///
    /// Sizes above [`MAX_BOARD_SIZE`] are clamped to it, so [`Self::size`]
    /// always matches the allocated cells.
    #[must_use]
    pub fn new(size: u32) -> Self {
        let size = size.min(MAX_BOARD_SIZE);
        let side = size as usize;
        Self {
            size,
            cells: vec![None; side * side],
        }
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Reports whether `position` lies on the grid.
    #[must_use]
    pub const fn in_bounds(&self, position: Position) -> bool {
        position.row() < self.size && position.column() < self.size
    }

    /// Returns the entity occupying `position`, if any.
    #[must_use]
    pub fn entity_at(&self, position: Position) -> Option<Entity> {
        self.index(position)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Binds `entity` to `position`.
    ///
    /// Any entity previously at `position` is dropped and reported through
    /// [`Placement::displaced`]. If `entity` already occupied another cell
    /// that cell is vacated and reported through [`Placement::origin`].
    pub fn place(&mut self, entity: Entity, position: Position) -> Result<Placement, GridError> {
        let target = self.index(position).ok_or(GridError::OutOfBounds {
            position,
            size: self.size,
        })?;

        let origin = self.position_of(entity.id());
        if origin == Some(position) {
            return Ok(Placement {
                displaced: None,
                origin,
            });
        }

        if let Some(previous) = origin.and_then(|cell| self.index(cell)) {
            self.cells[previous] = None;
        }

        let displaced = self.cells[target].replace(entity);
        Ok(Placement { displaced, origin })
    }

    /// Reports whether the entity with `id` occupies a cell.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.position_of(id).is_some()
    }

    /// Cell occupied by the entity with `id`, if it is on the board.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.iter()
            .find(|(_, entity)| entity.id() == id)
            .map(|(position, _)| position)
    }

    /// Number of occupied cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Reports whether no cell is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Iterates over occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Entity)> + '_ {
        let width = usize::try_from(self.size).unwrap_or(usize::MAX).max(1);
        self.cells.iter().enumerate().filter_map(move |(index, cell)| {
            let entity = (*cell)?;
            let row = u32::try_from(index / width).ok()?;
            let column = u32::try_from(index % width).ok()?;
            Some((Position::new(row, column), entity))
        })
    }

    fn index(&self, position: Position) -> Option<usize> {
        if self.in_bounds(position) {
            let row = usize::try_from(position.row()).ok()?;
            let column = usize::try_from(position.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
