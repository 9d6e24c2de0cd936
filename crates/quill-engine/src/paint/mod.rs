//! Paint model shared between the scene and the renderers.
//!
//! Scope:
//! - color representation (premultiplied alpha)
//! - solid-color brushes

pub mod brush;
pub mod color;

pub use brush::SolidBrush;
pub use color::Color;
