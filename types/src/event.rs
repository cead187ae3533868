//! Events published by blocks and domain actions.

use crate::ObjectKey;

/// Notification fired on a scope's event bus.
///
/// Blocks publish expand/collapse transitions; domain actions and undo
/// operations publish `VisibleDataChanged` after mutating objects that
/// may be on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    BlockExpanded(ObjectKey),
    BlockCollapsed(ObjectKey),
    VisibleDataChanged,
}

impl BoardEvent {
    /// The object this event is about, if any.
    #[must_use]
    pub fn object(&self) -> Option<&ObjectKey> {
        match self {
            Self::BlockExpanded(key) | Self::BlockCollapsed(key) => Some(key),
            Self::VisibleDataChanged => None,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BlockExpanded(_) => "block-expanded",
            Self::BlockCollapsed(_) => "block-collapsed",
            Self::VisibleDataChanged => "visible-data-changed",
        }
    }
}
