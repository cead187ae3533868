//! Headless view models for blocks.
//!
//! Pure data types with no rendering dependency. The engine mutates them,
//! a renderer reads them.

mod click;
mod header;
mod style;

pub use click::ClickModifiers;
pub use header::{BlockHeader, HeaderCell, PreHeaderPanel};
pub use style::StyleClasses;

/// Display state of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extension {
    #[default]
    Collapsed,
    Extended,
}

impl Extension {
    #[must_use]
    pub const fn from_extended(extended: bool) -> Self {
        if extended {
            Self::Extended
        } else {
            Self::Collapsed
        }
    }

    #[must_use]
    pub const fn is_extended(self) -> bool {
        matches!(self, Self::Extended)
    }
}

/// Style class carried by a block panel while extended.
pub const EXTENDED_CLASS: &str = "block-extended";
pub const BLOCK_CLASS: &str = "block";
