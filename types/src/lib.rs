//! Core data types for Blockboard.
//!
//! This crate contains identity keys, events, errors and headless view models
//! with no IO and no rendering. Everything here can be used from any layer.

#![allow(clippy::missing_errors_doc)]

mod error;
mod event;
mod ids;
pub mod ui;

pub use error::{BlockError, DndError};
pub use event::BoardEvent;
pub use ids::{BlockRef, HandleId, ListId, ObjectKey, SubscriptionId};
