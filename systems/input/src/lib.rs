#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that classifies board clicks into world commands.

use diplomacy_core::{Command, EntityId, Position};

/// Input snapshot distilled from adapter-provided pointer data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ClickInput {
    /// Indicates whether the primary button was clicked on this frame.
    pub primary_click: bool,
    /// Board cell under the cursor, absent when the cursor is off the board.
    pub cursor_cell: Option<Position>,
}

impl ClickInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(primary_click: bool, cursor_cell: Option<Position>) -> Self {
        Self {
            primary_click,
            cursor_cell,
        }
    }

    /// Shorthand for a primary click on `cell`.
    #[must_use]
    pub const fn click_at(cell: Position) -> Self {
        Self::new(true, Some(cell))
    }
}

/// Input system that routes a click to either the entity under the cursor or
/// the empty cell.
///
/// Clicks on occupied cells never produce [`Command::ClickCell`], so the world
/// only sees cell clicks for empty positions.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputMapper;

impl InputMapper {
    /// Creates a new input system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Consumes adapter input and emits at most one click command.
    ///
    /// The `entity_at` closure should mirror the semantics of the world's
    /// `query::entity_at` helper so the system can identify the clicked entity.
    pub fn handle<F>(&self, input: ClickInput, mut entity_at: F, out: &mut Vec<Command>)
    where
        F: FnMut(Position) -> Option<EntityId>,
    {
        if !input.primary_click {
            return;
        }

        let Some(cell) = input.cursor_cell else {
            return;
        };

        let command = match entity_at(cell) {
            Some(entity) => Command::ClickEntity { entity },
            None => Command::ClickCell { position: cell },
        };
        out.push(command);
    }
}
