//! Undo stack for committed domain mutations.
//!
//! Every action that mutates domain state pushes an [`UndoOperation`] in the
//! same step. Undo is strictly LIFO: only the most recent operation can be
//! reverted. The stack is bounded; when full, the oldest operation is evicted.

use std::collections::VecDeque;
use std::fmt;

use crate::events::EventBus;

/// Collaborators available to an operation while it is being undone.
pub struct UndoContext<'a> {
    pub events: &'a mut EventBus,
}

/// A reversible record of a committed mutation.
///
/// Operations own the prior state they need. `undo` must restore it and
/// fire whatever refresh event the restored data requires; the manager
/// does not infer what changed.
pub trait UndoOperation {
    fn label(&self) -> String;

    fn undo(self: Box<Self>, ctx: &mut UndoContext<'_>);
}

pub const DEFAULT_UNDO_CAPACITY: usize = 50;

pub struct UndoManager {
    /// Oldest first; the back is the next operation to undo.
    operations: VecDeque<Box<dyn UndoOperation>>,
    /// `None` keeps every operation.
    capacity: Option<usize>,
}

impl fmt::Debug for UndoManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoManager")
            .field("len", &self.operations.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::with_capacity(Some(DEFAULT_UNDO_CAPACITY))
    }
}

impl UndoManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A capacity of `Some(0)` is treated as unbounded.
    #[must_use]
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            operations: VecDeque::new(),
            capacity: capacity.filter(|cap| *cap > 0),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn add(&mut self, operation: Box<dyn UndoOperation>) {
        tracing::debug!(label = %operation.label(), "Undo operation added");
        self.operations.push_back(operation);
        if let Some(cap) = self.capacity {
            while self.operations.len() > cap {
                if let Some(evicted) = self.operations.pop_front() {
                    tracing::debug!(label = %evicted.label(), "Undo operation evicted");
                }
            }
        }
    }

    /// Pop the most recent operation and run its undo action.
    ///
    /// Returns the label of the undone operation, or `None` if the stack was empty.
    pub fn undo_last(&mut self, events: &mut EventBus) -> Option<String> {
        let operation = self.operations.pop_back()?;
        let label = operation.label();
        tracing::info!(label = %label, "Undo");
        operation.undo(&mut UndoContext { events });
        Some(label)
    }

    #[must_use]
    pub fn last_label(&self) -> Option<String> {
        self.operations.back().map(|op| op.label())
    }

    /// Labels, most recent first.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.operations.iter().rev().map(|op| op.label()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn clear(&mut self) {
        self.operations.clear();
    }
}
