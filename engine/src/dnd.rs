//! Drag-and-drop coordination between block lists.
//!
//! The coordinator knows which blocks can be picked up (drag handles) and
//! which blocks currently accept drops (drop targets). Both sets are keyed
//! by [`BlockRef`]; drop targets exist only while their block is mounted.
//!
//! A gesture runs `pick_up` → `hover`* → `release` (or `cancel`). At most
//! one drop marker is active during a gesture, and none afterwards.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use blockboard_types::{BlockRef, DndError, HandleId};

use crate::events::EventBus;
use crate::undo::UndoManager;

/// Collaborators handed to a drop action.
pub struct ActionContext<'a> {
    pub events: &'a mut EventBus,
    pub undo: &'a mut UndoManager,
}

/// Domain logic deciding whether a dropped item is accepted.
///
/// Returning `false` is a normal rejection: the action must not have
/// mutated anything or pushed an undo operation. Returning `true` commits
/// the drop; a mutating action pushes its undo operation before returning.
pub trait DropAction<O> {
    fn attempt_drop(&mut self, item: &O, ctx: &mut ActionContext<'_>) -> bool;
}

impl<O, F> DropAction<O> for F
where
    F: FnMut(&O, &mut ActionContext<'_>) -> bool,
{
    fn attempt_drop(&mut self, item: &O, ctx: &mut ActionContext<'_>) -> bool {
        self(item, ctx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DropTarget {
    marker_active: bool,
}

struct Draggable {
    block: BlockRef,
    item: Rc<dyn Any>,
}

struct Gesture {
    handle: HandleId,
    source: BlockRef,
    item: Rc<dyn Any>,
    hovered: Option<BlockRef>,
}

/// A drop that landed on a registered target, awaiting resolution by the
/// target's list.
pub struct PendingDrop {
    pub source: BlockRef,
    pub target: BlockRef,
    item: Rc<dyn Any>,
}

impl PendingDrop {
    /// The dragged domain object, if it is of type `O`.
    #[must_use]
    pub fn item<O: 'static>(&self) -> Option<&O> {
        self.item.downcast_ref::<O>()
    }

    #[must_use]
    pub fn is_same_list(&self) -> bool {
        self.source.list == self.target.list
    }
}

impl fmt::Debug for PendingDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDrop")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub enum DropRelease {
    /// Released outside any valid target. Nothing changed.
    Cancelled,
    Dropped(PendingDrop),
}

/// How a pending drop was resolved by its target list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Same-list drop on a sorting list: the block moved.
    Reordered,
    /// The drop action accepted the item.
    Committed,
    /// The drop action (or its absence) refused the item.
    Rejected,
}

#[derive(Default)]
pub struct DndCoordinator {
    draggables: HashMap<HandleId, Draggable>,
    targets: HashMap<BlockRef, DropTarget>,
    gesture: Option<Gesture>,
    next_handle: u64,
}

impl fmt::Debug for DndCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DndCoordinator")
            .field("draggables", &self.draggables.len())
            .field("targets", &self.targets.len())
            .field("dragging", &self.gesture.as_ref().map(|g| &g.source))
            .finish()
    }
}

impl DndCoordinator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a pick-up gesture for `item` to a new drag handle.
    pub fn make_draggable<O: 'static>(&mut self, block: BlockRef, item: O) -> HandleId {
        self.next_handle += 1;
        let handle = HandleId::new(self.next_handle);
        tracing::debug!(%block, %handle, "Draggable");
        self.draggables.insert(
            handle,
            Draggable {
                block,
                item: Rc::new(item),
            },
        );
        handle
    }

    /// Drop every handle bound to `block`. Cancels a gesture started from it.
    pub fn forget_draggable(&mut self, block: &BlockRef) {
        self.draggables.retain(|_, d| &d.block != block);
        if self
            .gesture
            .as_ref()
            .is_some_and(|gesture| &gesture.source == block)
        {
            self.cancel();
        }
    }

    #[must_use]
    pub fn handle_for(&self, block: &BlockRef) -> Option<HandleId> {
        self.draggables
            .iter()
            .find(|(_, d)| &d.block == block)
            .map(|(handle, _)| *handle)
    }

    /// Returns `false` if the block was already registered.
    pub fn register_drop_target(&mut self, block: BlockRef) -> bool {
        tracing::debug!(%block, "Drop target registered");
        self.targets
            .insert(block, DropTarget { marker_active: false })
            .is_none()
    }

    /// Unregistering an unknown target is a no-op returning `false`.
    pub fn unregister_drop_target(&mut self, block: &BlockRef) -> bool {
        let removed = self.targets.remove(block).is_some();
        if removed {
            tracing::debug!(%block, "Drop target unregistered");
            if let Some(gesture) = &mut self.gesture
                && gesture.hovered.as_ref() == Some(block)
            {
                gesture.hovered = None;
            }
        }
        removed
    }

    #[must_use]
    pub fn is_registered(&self, block: &BlockRef) -> bool {
        self.targets.contains_key(block)
    }

    #[must_use]
    pub fn drop_target_count(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_marker_active(&self, block: &BlockRef) -> bool {
        self.targets.get(block).is_some_and(|t| t.marker_active)
    }

    #[must_use]
    pub fn active_marker_count(&self) -> usize {
        self.targets.values().filter(|t| t.marker_active).count()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    #[must_use]
    pub fn dragged(&self) -> Option<&BlockRef> {
        self.gesture.as_ref().map(|g| &g.source)
    }

    pub fn pick_up(&mut self, handle: HandleId) -> Result<BlockRef, DndError> {
        if self.gesture.is_some() {
            return Err(DndError::GestureInProgress);
        }
        let draggable = self
            .draggables
            .get(&handle)
            .ok_or_else(|| DndError::NotDraggable {
                key: handle.to_string(),
            })?;
        let source = draggable.block.clone();
        tracing::debug!(%source, "Drag started");
        self.gesture = Some(Gesture {
            handle,
            source: source.clone(),
            item: Rc::clone(&draggable.item),
            hovered: None,
        });
        Ok(source)
    }

    /// Move the gesture over `target`.
    ///
    /// Returns `true` if `target` is a valid drop position, whose marker is
    /// now the only active one. Hovering the dragged block itself, or a
    /// block that is not registered, clears all markers.
    pub fn hover(&mut self, target: &BlockRef) -> bool {
        let Some(gesture) = &mut self.gesture else {
            return false;
        };
        let valid = &gesture.source != target && self.targets.contains_key(target);
        gesture.hovered = valid.then(|| target.clone());
        for (block, state) in &mut self.targets {
            state.marker_active = valid && block == target;
        }
        valid
    }

    /// Move the gesture off every target.
    pub fn leave(&mut self) {
        if let Some(gesture) = &mut self.gesture {
            gesture.hovered = None;
        }
        self.deactivate_markers();
    }

    /// Finish the gesture.
    ///
    /// Markers end inactive whatever the outcome. Releasing with no gesture
    /// in progress is reported as `Cancelled`.
    pub fn release(&mut self) -> DropRelease {
        self.deactivate_markers();
        let Some(gesture) = self.gesture.take() else {
            return DropRelease::Cancelled;
        };
        match gesture.hovered {
            Some(target) if self.targets.contains_key(&target) => {
                tracing::debug!(source = %gesture.source, %target, handle = %gesture.handle, "Dropped");
                DropRelease::Dropped(PendingDrop {
                    source: gesture.source,
                    target,
                    item: gesture.item,
                })
            }
            _ => {
                tracing::debug!(source = %gesture.source, "Drag released outside any target");
                DropRelease::Cancelled
            }
        }
    }

    /// Abort the gesture. Returns `false` if none was in progress.
    pub fn cancel(&mut self) -> bool {
        self.deactivate_markers();
        let cancelled = self.gesture.take().is_some();
        if cancelled {
            tracing::debug!("Drag cancelled");
        }
        cancelled
    }

    fn deactivate_markers(&mut self) {
        for state in self.targets.values_mut() {
            state.marker_active = false;
        }
    }
}
