//! Frame timing.
//!
//! One `FrameClock` per loop; call `tick()` once per iteration.

mod frame_clock;
mod stats;

pub use frame_clock::{FrameClock, FrameTime};
pub use stats::{FrameReport, FrameStats};
