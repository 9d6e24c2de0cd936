//! Quill engine crate.
//!
//! Platform host, GPU device and presentation, input, frame timing, draw
//! list, rect and text renderers, and the font system used by the demo.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod text;
