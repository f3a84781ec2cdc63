//! Presentation layer: rendering targets and markup.

/// HTML rendering.
pub mod markup;
/// Rendering targets.
pub mod widgets;

pub use markup::render_img;
pub use widgets::{ImageAttributes, LazyImage};
