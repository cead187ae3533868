use crate::HandleId;

/// A cell appended to a block header after the title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub text: String,
    /// Primary cells take the remaining width; secondary ones shrink to fit.
    pub primary: bool,
}

/// The always-visible top row of a block.
///
/// Views fill it in when the block is initialized and refresh it on every
/// update. The drag handle is only present when the owning list has
/// drag-and-drop enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockHeader {
    title: String,
    cells: Vec<HeaderCell>,
    drag_handle: Option<HandleId>,
}

impl BlockHeader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn append_cell(&mut self, text: impl Into<String>, primary: bool) {
        self.cells.push(HeaderCell {
            text: text.into(),
            primary,
        });
    }

    /// Replace the text of an existing cell, appending if `index` is past the end.
    pub fn set_cell(&mut self, index: usize, text: impl Into<String>) {
        let text = text.into();
        match self.cells.get_mut(index) {
            Some(cell) => cell.text = text,
            None => self.append_cell(text, false),
        }
    }

    #[must_use]
    pub fn cells(&self) -> &[HeaderCell] {
        &self.cells
    }

    pub fn set_drag_handle(&mut self, handle: HandleId) {
        self.drag_handle = Some(handle);
    }

    #[must_use]
    pub fn drag_handle(&self) -> Option<HandleId> {
        self.drag_handle
    }
}

/// Free-form lines rendered above a block's header (e.g. status banners).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreHeaderPanel {
    pub lines: Vec<String>,
}
