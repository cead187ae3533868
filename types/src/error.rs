use thiserror::Error;

use crate::ObjectKey;

/// Programming errors raised by the block lifecycle.
///
/// None of these are recoverable: they indicate a view that re-enters
/// the update path or a list used with objects it does not hold.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("body of {block} is initializing; update() must not be called from body construction")]
    ReentrantUpdate { block: String },
    #[error("body construction for {block} failed earlier ({reason}); not retrying")]
    BodyFailed { block: String, reason: String },
    #[error("body construction failed: {reason}")]
    BodyBuild { reason: String },
    #[error("no block bound to {key}")]
    UnknownObject { key: ObjectKey },
    #[error("a block for {key} is already in this list")]
    DuplicateObject { key: ObjectKey },
}

impl BlockError {
    pub fn body_build(reason: impl Into<String>) -> Self {
        Self::BodyBuild {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DndError {
    #[error("{key} has no registered drag handle")]
    NotDraggable { key: String },
    #[error("a drag gesture is already in progress")]
    GestureInProgress,
}
