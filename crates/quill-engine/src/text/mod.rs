//! Fonts, text styles and shaping.
//!
//! Flow:
//! - `FontDatabase` turns a family name into face bytes (system fonts)
//! - `FontSystem` parses and owns the faces, handing out `FontId`s
//! - `TextStyle` pairs a font with a size
//! - `Shaper` lays text out per draw; `TextBlock` keeps a pre-shaped paragraph

mod block;
mod error;
mod font_db;
mod font_system;
mod measuring;
mod shaping;
mod style;

pub use block::TextBlock;
pub use error::FontError;
pub use font_db::{FaceData, FontDatabase};
pub use font_system::{FontId, FontSystem};
pub use measuring::{DrawTextOptions, MeasuringMode};
pub use shaping::{ShapedGlyph, Shaper};
pub use style::TextStyle;

/// Public-domain face bundled for tests.
#[cfg(test)]
pub(crate) const TEST_FONT: &[u8] = include_bytes!("../../assets/fonts/Tuffy.ttf");
