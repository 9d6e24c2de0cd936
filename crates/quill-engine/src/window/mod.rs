//! Platform host: owns the `winit` event loop and the window.
//!
//! The host is pumped, not run: the frame loop drains pending events once per
//! iteration and keeps control of its own timing.

mod host;

pub use host::{Host, HostConfig, SurfaceHandle};
