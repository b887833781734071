//! Single-slot holders for the selected entity and the piece awaiting placement.

use diplomacy_core::Entity;

/// Entity currently chosen by the active team.
///
/// Ownership checks belong to the resolver; this holder accepts any entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<Entity>,
}

impl SelectionState {
    /// Creates an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self { selected: None }
    }

    /// Selects `entity`, returning the entity it replaced.
    ///
    /// Selecting the already selected entity does nothing and returns `None`.
    pub fn select(&mut self, entity: Entity) -> Option<Entity> {
        if self.is_selected(entity) {
            return None;
        }
        self.selected.replace(entity)
    }

    /// Clears the selection, returning the previously selected entity.
    pub fn clear(&mut self) -> Option<Entity> {
        self.selected.take()
    }

    /// Currently selected entity.
    #[must_use]
    pub const fn current(&self) -> Option<Entity> {
        self.selected
    }

    /// Reports whether `entity` is the selected entity.
    #[must_use]
    pub fn is_selected(&self, entity: Entity) -> bool {
        self.selected.map(|selected| selected.id()) == Some(entity.id())
    }
}

/// Freshly created entity waiting for a target cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PendingPlacement {
    pending: Option<Entity>,
}

impl PendingPlacement {
    /// Creates an empty holder.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Queues `entity`, returning the pending entity it overwrote.
    pub fn set(&mut self, entity: Entity) -> Option<Entity> {
        self.pending.replace(entity)
    }

    /// Removes and returns the pending entity.
    pub fn take(&mut self) -> Option<Entity> {
        self.pending.take()
    }

    /// Pending entity, if any.
    #[must_use]
    pub const fn current(&self) -> Option<Entity> {
        self.pending
    }

    /// Reports whether an entity awaits placement.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
