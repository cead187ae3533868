//! Ordered container of blocks with accordion/multi-expand policy.

use std::fmt;
use std::mem;

use blockboard_types::ui::ClickModifiers;
use blockboard_types::{BlockError, BlockRef, HandleId, ListId, ObjectKey};

use crate::block::{Block, BlockObject, BlockView};
use crate::config::BoardConfig;
use crate::dnd::{ActionContext, DropAction, DropOutcome, PendingDrop};
use crate::scope::Scope;

type ViewFactory<O, V> = Box<dyn FnMut(&O) -> V>;

/// An ordered list of blocks, at most one per domain object.
///
/// Whether a click extends exclusively is decided per click from the held
/// modifiers, not by a list setting; `exclusive_by_default` only picks which
/// of the two a plain click means.
pub struct BlockList<O: BlockObject, V: BlockView<O>> {
    id: ListId,
    blocks: Vec<Block<O, V>>,
    factory: ViewFactory<O, V>,
    dnd_enabled: bool,
    dnd_sorting: bool,
    exclusive_by_default: bool,
    drop_action: Option<Box<dyn DropAction<O>>>,
    mounted: bool,
}

impl<O: BlockObject, V: BlockView<O>> fmt::Debug for BlockList<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockList")
            .field("id", &self.id)
            .field("blocks", &self.blocks)
            .field("dnd_enabled", &self.dnd_enabled)
            .field("dnd_sorting", &self.dnd_sorting)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}

impl<O: BlockObject, V: BlockView<O>> BlockList<O, V> {
    pub fn new(id: ListId, factory: impl FnMut(&O) -> V + 'static) -> Self {
        Self {
            id,
            blocks: Vec::new(),
            factory: Box::new(factory),
            dnd_enabled: false,
            dnd_sorting: false,
            exclusive_by_default: true,
            drop_action: None,
            mounted: false,
        }
    }

    /// A list with drag-and-drop and click policy taken from `config`.
    pub fn from_config(id: ListId, factory: impl FnMut(&O) -> V + 'static, config: &BoardConfig) -> Self {
        Self::new(id, factory)
            .with_dnd(config.dnd_enabled(), config.dnd_sorting())
            .exclusive_by_default(config.exclusive_by_default())
    }

    /// Sorting implies drag-and-drop.
    #[must_use]
    pub fn with_dnd(mut self, enabled: bool, sorting: bool) -> Self {
        self.dnd_enabled = enabled || sorting;
        self.dnd_sorting = sorting;
        self
    }

    #[must_use]
    pub fn with_drop_action(mut self, action: impl DropAction<O> + 'static) -> Self {
        self.drop_action = Some(Box::new(action));
        self
    }

    #[must_use]
    pub fn exclusive_by_default(mut self, exclusive: bool) -> Self {
        self.exclusive_by_default = exclusive;
        self
    }

    pub fn id(&self) -> ListId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn is_dnd_enabled(&self) -> bool {
        self.dnd_enabled
    }

    pub fn is_dnd_sorting(&self) -> bool {
        self.dnd_sorting
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block<O, V>> {
        self.blocks.iter()
    }

    pub fn objects(&self) -> impl Iterator<Item = &O> {
        self.blocks.iter().map(Block::object)
    }

    pub fn keys(&self) -> Vec<ObjectKey> {
        self.blocks.iter().map(|b| b.key().clone()).collect()
    }

    pub fn contains(&self, object: &O) -> bool {
        self.position(&object.key()).is_some()
    }

    pub fn block(&self, object: &O) -> Option<&Block<O, V>> {
        self.block_by_key(&object.key())
    }

    pub fn block_by_key(&self, key: &ObjectKey) -> Option<&Block<O, V>> {
        self.position(key).map(|idx| &self.blocks[idx])
    }

    pub fn block_mut(&mut self, object: &O) -> Option<&mut Block<O, V>> {
        let idx = self.position(&object.key())?;
        Some(&mut self.blocks[idx])
    }

    pub fn handle_of(&self, object: &O) -> Option<HandleId> {
        self.block(object).and_then(|b| b.header().drag_handle())
    }

    pub fn block_ref(&self, object: &O) -> BlockRef {
        BlockRef::new(self.id, object.key())
    }

    fn position(&self, key: &ObjectKey) -> Option<usize> {
        self.blocks.iter().position(|b| b.key() == key)
    }

    fn require(&self, object: &O) -> Result<usize, BlockError> {
        let key = object.key();
        self.position(&key).ok_or_else(|| {
            let err = BlockError::UnknownObject { key };
            tracing::error!(list = %self.id, %err, "Unknown block object");
            err
        })
    }

    pub fn add(&mut self, object: O, scope: &mut Scope) -> Result<(), BlockError> {
        self.insert(self.blocks.len(), object, scope)
    }

    /// Insert a block for `object` at `index` (clamped to the list length).
    pub fn insert(&mut self, index: usize, object: O, scope: &mut Scope) -> Result<(), BlockError> {
        let key = object.key();
        if self.position(&key).is_some() {
            let err = BlockError::DuplicateObject { key };
            tracing::error!(list = %self.id, %err, "Duplicate block object");
            return Err(err);
        }
        let block = self.create_block(object, scope)?;
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
        Ok(())
    }

    fn create_block(&mut self, object: O, scope: &mut Scope) -> Result<Block<O, V>, BlockError> {
        let view = (self.factory)(&object);
        let mut block = Block::new(object, view);
        block.attach(self.id);
        block.initialize(self.dnd_enabled.then_some(&mut scope.dnd));
        block.update()?;
        if self.mounted {
            block.mount(&mut scope.dnd, self.dnd_sorting, &mut scope.events);
        }
        Ok(block)
    }

    /// Remove the block bound to `object`. Returns `false` if there was none.
    pub fn remove(&mut self, object: &O, scope: &mut Scope) -> bool {
        let Some(idx) = self.position(&object.key()) else {
            return false;
        };
        let block = self.blocks.remove(idx);
        self.dispose(block, scope);
        true
    }

    pub fn clear(&mut self, scope: &mut Scope) {
        for block in mem::take(&mut self.blocks) {
            self.dispose(block, scope);
        }
    }

    fn dispose(&self, mut block: Block<O, V>, scope: &mut Scope) {
        if block.is_mounted() {
            block.unmount(&mut scope.dnd, &mut scope.events);
        }
        if let Some(block_ref) = block.block_ref() {
            scope.dnd.forget_draggable(&block_ref);
        }
        block.detach();
        tracing::debug!(list = %self.id, block = %block, "Block removed");
    }

    /// Make the list show exactly `objects`, in that order.
    ///
    /// Blocks for objects already present are kept with their extension
    /// state and body; others are created or disposed.
    pub fn set_objects(&mut self, objects: impl IntoIterator<Item = O>, scope: &mut Scope) -> Result<(), BlockError> {
        let mut old: Vec<Option<Block<O, V>>> = mem::take(&mut self.blocks)
            .into_iter()
            .map(Some)
            .collect();
        let mut result = Ok(());
        for object in objects {
            let key = object.key();
            if self.position(&key).is_some() {
                continue;
            }
            let reused = old
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|b| b.key() == &key))
                .and_then(Option::take);
            match reused {
                Some(mut block) => {
                    if let Err(err) = block.update() {
                        result = result.and(Err(err));
                    }
                    self.blocks.push(block);
                }
                None => match self.create_block(object, scope) {
                    Ok(block) => self.blocks.push(block),
                    Err(err) => result = result.and(Err(err)),
                },
            }
        }
        for block in old.into_iter().flatten() {
            self.dispose(block, scope);
        }
        result
    }

    /// Flip the extension of the block bound to `object`.
    ///
    /// Extending with `exclusive` collapses every other extended block
    /// first, so listeners see the collapses before the expansion.
    /// Collapsing never touches other blocks.
    pub fn toggle_extension(&mut self, object: &O, exclusive: bool, scope: &mut Scope) -> Result<(), BlockError> {
        let idx = self.require(object)?;
        if self.blocks[idx].is_extended() {
            self.blocks[idx].set_extended(false, &mut scope.events)?;
            Ok(())
        } else {
            self.extend_at(idx, exclusive, scope)
        }
    }

    /// Extend the block bound to `object`, collapsing the others when `exclusive`.
    pub fn extend_object(&mut self, object: &O, exclusive: bool, scope: &mut Scope) -> Result<(), BlockError> {
        let idx = self.require(object)?;
        self.extend_at(idx, exclusive, scope)
    }

    fn extend_at(&mut self, idx: usize, exclusive: bool, scope: &mut Scope) -> Result<(), BlockError> {
        if exclusive {
            for (other_idx, other) in self.blocks.iter_mut().enumerate() {
                if other_idx != idx && other.is_extended() {
                    other.set_extended(false, &mut scope.events)?;
                }
            }
        }
        self.blocks[idx].set_extended(true, &mut scope.events)?;
        Ok(())
    }

    pub fn collapse_object(&mut self, object: &O, scope: &mut Scope) -> Result<(), BlockError> {
        let idx = self.require(object)?;
        self.blocks[idx].set_extended(false, &mut scope.events)?;
        Ok(())
    }

    pub fn collapse_all(&mut self, scope: &mut Scope) -> Result<(), BlockError> {
        for block in &mut self.blocks {
            block.set_extended(false, &mut scope.events)?;
        }
        Ok(())
    }

    pub fn is_extended(&self, object: &O) -> bool {
        self.block(object).is_some_and(Block::is_extended)
    }

    pub fn extended_objects(&self) -> Vec<&O> {
        self.blocks
            .iter()
            .filter(|b| b.is_extended())
            .map(Block::object)
            .collect()
    }

    /// Extend `object` exclusively, run its activation hook and ask for it
    /// to be scrolled into view.
    pub fn activate(&mut self, object: &O, scope: &mut Scope) -> Result<(), BlockError> {
        let idx = self.require(object)?;
        self.extend_at(idx, true, scope)?;
        self.blocks[idx].activate();
        Ok(())
    }

    /// Header click on the block bound to `object`. The click is consumed.
    ///
    /// A plain click toggles exclusively and a click with ctrl, shift or alt
    /// held toggles only the target (the reverse when the list is not
    /// exclusive by default).
    pub fn on_header_click(&mut self, object: &O, modifiers: ClickModifiers, scope: &mut Scope) -> Result<(), BlockError> {
        let exclusive = self.exclusive_by_default != modifiers.any();
        self.toggle_extension(object, exclusive, scope)
    }

    pub fn update_all(&mut self) -> Result<(), BlockError> {
        for block in &mut self.blocks {
            block.update()?;
        }
        Ok(())
    }

    /// Mount every block. Mounting a mounted list is a no-op.
    pub fn mount(&mut self, scope: &mut Scope) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        for block in &mut self.blocks {
            block.mount(&mut scope.dnd, self.dnd_sorting, &mut scope.events);
        }
        tracing::debug!(list = %self.id, blocks = self.blocks.len(), "List mounted");
    }

    pub fn unmount(&mut self, scope: &mut Scope) {
        if !self.mounted {
            return;
        }
        for block in &mut self.blocks {
            block.unmount(&mut scope.dnd, &mut scope.events);
        }
        self.mounted = false;
        tracing::debug!(list = %self.id, "List unmounted");
    }

    /// Resolve a drop that landed on one of this list's blocks.
    ///
    /// A drop from this same list onto a sorting list moves the dragged
    /// block in front of the target. Any other drop goes to the list's drop
    /// action; without one, or for an item of another type, it is rejected.
    pub fn accept_drop(&mut self, pending: PendingDrop, scope: &mut Scope) -> DropOutcome {
        if pending.target.list != self.id {
            tracing::warn!(list = %self.id, target = %pending.target, "Drop routed to the wrong list");
            return DropOutcome::Rejected;
        }

        if pending.is_same_list() && self.dnd_sorting {
            let from = self.position(&pending.source.object);
            let to = self.position(&pending.target.object);
            if let (Some(from), Some(to)) = (from, to) {
                let block = self.blocks.remove(from);
                let to = if from < to { to - 1 } else { to };
                self.blocks.insert(to, block);
                tracing::debug!(list = %self.id, from, to, "Block moved");
                return DropOutcome::Reordered;
            }
            return DropOutcome::Rejected;
        }

        let (Some(item), Some(action)) = (pending.item::<O>(), self.drop_action.as_mut()) else {
            return DropOutcome::Rejected;
        };
        let mut ctx = ActionContext {
            events: &mut scope.events,
            undo: &mut scope.undo,
        };
        if action.attempt_drop(item, &mut ctx) {
            tracing::info!(item = %item, list = %self.id, "Drop committed");
            DropOutcome::Committed
        } else {
            DropOutcome::Rejected
        }
    }
}
