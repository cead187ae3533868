//! Shared collaborators for one board.
//!
//! A scope bundles the event bus, the undo stack and the drag-and-drop
//! coordinator. Lists and actions receive it explicitly; nothing is looked
//! up globally.

use crate::config::BoardConfig;
use crate::dnd::DndCoordinator;
use crate::events::EventBus;
use crate::undo::UndoManager;

#[derive(Debug, Default)]
pub struct Scope {
    pub events: EventBus,
    pub undo: UndoManager,
    pub dnd: DndCoordinator,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            events: EventBus::new(),
            undo: UndoManager::with_capacity(config.undo_capacity()),
            dnd: DndCoordinator::new(),
        }
    }

    /// Undo the most recent operation. Returns its label.
    pub fn undo_last(&mut self) -> Option<String> {
        self.undo.undo_last(&mut self.events)
    }
}
