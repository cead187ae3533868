//! Block engine for Blockboard.
//!
//! Collapsible blocks bound to domain objects, ordered block lists with
//! accordion or multi-expand behavior, drag-and-drop between lists, and an
//! undo stack for the mutations drops commit. Single-threaded: every
//! operation runs to completion, events included, before the next starts.

#![allow(clippy::missing_errors_doc)]

mod block;
mod block_list;
mod config;
mod dnd;
mod events;
mod scope;
mod undo;

pub use blockboard_types::{
    BlockError, BlockRef, BoardEvent, DndError, HandleId, ListId, ObjectKey, SubscriptionId, ui,
};
pub use block::{Block, BlockObject, BlockView, BodyContext};
pub use block_list::BlockList;
pub use config::{BoardConfig, ConfigError, UNDO_CAPACITY_ENV, config_path};
pub use dnd::{ActionContext, DndCoordinator, DropAction, DropOutcome, DropRelease, PendingDrop};
pub use events::{EventBus, EventLog};
pub use scope::Scope;
pub use undo::{DEFAULT_UNDO_CAPACITY, UndoContext, UndoManager, UndoOperation};
