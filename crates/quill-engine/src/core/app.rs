use std::time::Duration;

use crate::input::Key;
use crate::paint::Color;
use crate::scene::DrawList;
use crate::text::FontSystem;
use crate::time::FrameTime;

use super::LoopExit;

/// Control directive returned by event sources.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Source of platform events for the frame loop.
///
/// Implemented by [`Host`](crate::window::Host) over winit, and by in-memory
/// fakes in tests.
pub trait EventSource {
    /// Processes every pending event, waiting at most `timeout` for the first.
    ///
    /// A zero timeout never blocks. Returns `Exit` once the platform has
    /// closed the window.
    fn drain(&mut self, timeout: Duration) -> AppControl;

    /// True while `key` is held down, as of the last drain.
    fn key_down(&self, key: Key) -> bool;

    /// Most recent surface size in physical pixels, if it changed since the last call.
    fn take_resize(&mut self) -> Option<(u32, u32)>;
}

/// Application content drawn by the frame loop.
pub trait View {
    fn clear_color(&self) -> Color;

    /// Fonts referenced by the text commands this view records.
    fn fonts(&self) -> &FontSystem;

    /// Records one frame into `list`. The list is empty on entry.
    fn draw(&mut self, list: &mut DrawList, time: FrameTime);

    /// Called once when the loop stops.
    fn finish(&mut self, exit: LoopExit) {
        let _ = exit;
    }
}
