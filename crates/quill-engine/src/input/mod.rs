//! Keyboard input.
//!
//! The public API does not expose winit types; the host translates platform
//! events through [`platform::winit`].

pub mod platform;
mod state;
mod types;

pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
