//! Box-drawn rendering of the test trees

mod glyphs;
mod label;
mod tree;

pub use glyphs::{cross, line};
pub use label::{case_label, disambiguation_suffix, format_parameter};
pub use tree::{render_listing, render_tree, RenderedTree, TreeLine};

use thiserror::Error;

use crate::navigation::NavError;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(
        "glyph weights disagree (last: {is_last}, thick vertical: {thick_vertical}, thick horizontal: {thick_horizontal})"
    )]
    GlyphMismatch {
        is_last: bool,
        thick_vertical: bool,
        thick_horizontal: bool,
    },

    #[error(transparent)]
    Navigation(#[from] NavError),
}
