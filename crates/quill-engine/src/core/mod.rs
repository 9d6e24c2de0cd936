//! Contracts between the platform host, the presenter and application views,
//! plus the frame loop that drives them.

mod app;
mod frame_loop;
mod presenter;

pub use app::{AppControl, EventSource, View};
pub use frame_loop::{CancelToken, FrameLoop, LoopExit, IDLE_WAIT};
pub use presenter::{GpuPresenter, PresentOutcome, Presenter};
