//! A collapsible panel bound to one domain object.
//!
//! The header is built when the block is initialized and refreshed on every
//! update. The body is built lazily the first time the block is updated
//! while extended, at most once per block, and kept across collapse/expand
//! cycles; only its mount point (the body wrapper) is discarded on collapse.

use std::fmt;
use std::mem;

use blockboard_types::ui::{
    BLOCK_CLASS, BlockHeader, EXTENDED_CLASS, Extension, PreHeaderPanel, StyleClasses,
};
use blockboard_types::{BlockError, BlockRef, BoardEvent, ListId, ObjectKey};

use crate::dnd::DndCoordinator;
use crate::events::EventBus;

/// A domain object that can be shown in a block.
///
/// Objects are held by clone, so implementors are usually cheap handles
/// onto externally owned data. The key decides identity.
pub trait BlockObject: Clone + fmt::Display + 'static {
    fn key(&self) -> ObjectKey;
}

/// Per-kind header and body construction, injected into every block of a list.
pub trait BlockView<O> {
    type Body;

    fn build_header(&mut self, object: &O, header: &mut BlockHeader);

    fn refresh_header(&mut self, object: &O, header: &mut BlockHeader);

    /// Build the body shown while extended. Called at most once per block.
    fn build_body(&mut self, object: &O, ctx: &BodyContext<'_>) -> Result<Self::Body, BlockError>;

    fn refresh_body(&mut self, _object: &O, _body: &mut Self::Body) {}

    fn on_activation(&mut self, _object: &O) {}
}

/// Handed to [`BlockView::build_body`].
///
/// The block is mid-construction while the body is built, so any update
/// requested from here is a reentrant call and is refused.
pub struct BodyContext<'a> {
    block: &'a str,
}

impl BodyContext<'_> {
    pub fn request_update(&self) -> Result<(), BlockError> {
        Err(BlockError::ReentrantUpdate {
            block: self.block.to_string(),
        })
    }

    #[must_use]
    pub fn block(&self) -> &str {
        self.block
    }
}

#[derive(Debug)]
enum BodyState<B> {
    Uninitialized,
    Initializing,
    Ready(B),
    Failed(String),
}

pub struct Block<O: BlockObject, V: BlockView<O>> {
    object: O,
    key: ObjectKey,
    view: V,
    extension: Extension,
    /// Back-reference to the owning list; set on attach, cleared on detach.
    list: Option<ListId>,
    header: BlockHeader,
    panel_classes: StyleClasses,
    pre_header: Option<PreHeaderPanel>,
    body: BodyState<V::Body>,
    body_attached: bool,
    initialized: bool,
    mounted: bool,
    scroll_requested: bool,
}

impl<O: BlockObject, V: BlockView<O>> Block<O, V> {
    pub(crate) fn new(object: O, view: V) -> Self {
        let key = object.key();
        Self {
            object,
            key,
            view,
            extension: Extension::Collapsed,
            list: None,
            header: BlockHeader::new(),
            panel_classes: StyleClasses::default(),
            pre_header: None,
            body: BodyState::Uninitialized,
            body_attached: false,
            initialized: false,
            mounted: false,
            scroll_requested: false,
        }
    }

    pub fn object(&self) -> &O {
        &self.object
    }

    pub fn key(&self) -> &ObjectKey {
        &self.key
    }

    pub fn list(&self) -> Option<ListId> {
        self.list
    }

    pub fn block_ref(&self) -> Option<BlockRef> {
        self.list.map(|list| BlockRef::new(list, self.key.clone()))
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn header(&self) -> &BlockHeader {
        &self.header
    }

    pub fn panel_classes(&self) -> &StyleClasses {
        &self.panel_classes
    }

    pub fn extension(&self) -> Extension {
        self.extension
    }

    pub fn is_extended(&self) -> bool {
        self.extension.is_extended()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_body_initialized(&self) -> bool {
        matches!(self.body, BodyState::Ready(_))
    }

    pub fn is_body_failed(&self) -> bool {
        matches!(self.body, BodyState::Failed(_))
    }

    /// The body, once built. Still available while collapsed.
    pub fn body(&self) -> Option<&V::Body> {
        match &self.body {
            BodyState::Ready(body) => Some(body),
            _ => None,
        }
    }

    /// Whether the body is currently mounted in the panel.
    pub fn is_body_attached(&self) -> bool {
        self.body_attached
    }

    /// The panel above the header, created on first access.
    pub fn pre_header_panel(&mut self) -> &mut PreHeaderPanel {
        self.pre_header.get_or_insert_with(PreHeaderPanel::default)
    }

    pub fn has_pre_header_panel(&self) -> bool {
        self.pre_header.is_some()
    }

    pub(crate) fn attach(&mut self, list: ListId) {
        self.list = Some(list);
    }

    pub(crate) fn detach(&mut self) {
        self.list = None;
    }

    /// Build the header and, when `dnd` is given, bind its drag handle.
    pub(crate) fn initialize(&mut self, dnd: Option<&mut DndCoordinator>) {
        self.header = BlockHeader::new();
        if let (Some(dnd), Some(block)) = (dnd, self.block_ref()) {
            let handle = dnd.make_draggable(block, self.object.clone());
            self.header.set_drag_handle(handle);
        }
        self.panel_classes = StyleClasses::with(BLOCK_CLASS);
        if self.is_extended() {
            self.panel_classes.add(EXTENDED_CLASS);
        }
        self.view.build_header(&self.object, &mut self.header);
        self.initialized = true;
        tracing::debug!(block = %self, "Block initialized");
    }

    /// Refresh the header and, while extended, make sure the body exists,
    /// refresh it and attach it to the panel.
    pub fn update(&mut self) -> Result<(), BlockError> {
        if !self.initialized {
            self.initialize(None);
        }
        self.view.refresh_header(&self.object, &mut self.header);

        if self.is_extended() {
            self.ensure_body()?;
            if let BodyState::Ready(body) = &mut self.body {
                self.view.refresh_body(&self.object, body);
            }
            self.body_attached = true;
        } else {
            self.body_attached = false;
        }
        Ok(())
    }

    fn ensure_body(&mut self) -> Result<(), BlockError> {
        match &self.body {
            BodyState::Ready(_) => return Ok(()),
            BodyState::Initializing => {
                let err = BlockError::ReentrantUpdate {
                    block: self.to_string(),
                };
                tracing::error!(%err, "Reentrant block update");
                return Err(err);
            }
            BodyState::Failed(reason) => {
                return Err(BlockError::BodyFailed {
                    block: self.to_string(),
                    reason: reason.clone(),
                });
            }
            BodyState::Uninitialized => {}
        }

        self.body = BodyState::Initializing;
        let name = self.to_string();
        tracing::debug!(block = %name, "Initializing body");
        let ctx = BodyContext { block: &name };
        match self.view.build_body(&self.object, &ctx) {
            Ok(body) => {
                self.body = BodyState::Ready(body);
                Ok(())
            }
            Err(err @ BlockError::ReentrantUpdate { .. }) => {
                tracing::error!(%err, "Reentrant block update");
                self.body = BodyState::Uninitialized;
                Err(err)
            }
            Err(err) => {
                tracing::error!(block = %name, %err, "Body construction failed");
                self.body = BodyState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    /// Transition between collapsed and extended.
    ///
    /// Returns `Ok(false)` without firing anything if the block is already
    /// in the requested state.
    pub fn set_extended(&mut self, extended: bool, events: &mut EventBus) -> Result<bool, BlockError> {
        if self.is_extended() == extended {
            return Ok(false);
        }
        self.extension = Extension::from_extended(extended);

        if extended {
            events.fire(BoardEvent::BlockExpanded(self.key.clone()));
            self.panel_classes.add(EXTENDED_CLASS);
        } else {
            events.fire(BoardEvent::BlockCollapsed(self.key.clone()));
            self.panel_classes.remove(EXTENDED_CLASS);
        }

        self.update()?;
        Ok(true)
    }

    /// Run the view's activation hook and ask to be scrolled into view.
    pub fn activate(&mut self) {
        self.view.on_activation(&self.object);
        self.scroll_requested = true;
    }

    /// Consume a pending scroll-into-view request.
    pub fn take_scroll_request(&mut self) -> bool {
        mem::take(&mut self.scroll_requested)
    }

    /// Called when the block enters the visible tree.
    ///
    /// Registers as a drop target when `sorting` is set, and re-fires
    /// `BlockExpanded` if the block is already extended.
    pub(crate) fn mount(&mut self, dnd: &mut DndCoordinator, sorting: bool, events: &mut EventBus) {
        if self.mounted {
            tracing::warn!(block = %self, "Block mounted twice");
            return;
        }
        self.mounted = true;
        if sorting && let Some(block) = self.block_ref() {
            dnd.register_drop_target(block);
        }
        if self.is_extended() {
            events.fire(BoardEvent::BlockExpanded(self.key.clone()));
        }
    }

    /// Called when the block leaves the visible tree.
    ///
    /// Fires a compensating `BlockCollapsed` if extended and drops any drop
    /// target registration.
    pub(crate) fn unmount(&mut self, dnd: &mut DndCoordinator, events: &mut EventBus) {
        if !self.mounted {
            tracing::warn!(block = %self, "Unmount of a block that is not mounted");
            return;
        }
        if self.is_extended() {
            events.fire(BoardEvent::BlockCollapsed(self.key.clone()));
        }
        if let Some(block) = self.block_ref() {
            dnd.unregister_drop_target(&block);
        }
        self.mounted = false;
    }

    pub fn drop_marker_active(&self, dnd: &DndCoordinator) -> bool {
        self.block_ref()
            .is_some_and(|block| dnd.is_marker_active(&block))
    }
}

impl<O: BlockObject, V: BlockView<O>> fmt::Display for Block<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.object)
    }
}

impl<O: BlockObject, V: BlockView<O>> fmt::Debug for Block<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("key", &self.key)
            .field("list", &self.list)
            .field("extension", &self.extension)
            .field("mounted", &self.mounted)
            .field("body_initialized", &self.is_body_initialized())
            .finish_non_exhaustive()
    }
}
