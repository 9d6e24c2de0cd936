use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;

use crate::input::Key;
use crate::scene::DrawList;
use crate::time::{FrameClock, FrameStats};

use super::{AppControl, EventSource, PresentOutcome, Presenter, View};

/// Cooperative stop signal for [`FrameLoop::run`].
///
/// Clones share one flag, so a clone can be moved to another thread
/// (e.g. a Ctrl-C handler) and triggered from there.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why the frame loop stopped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum LoopExit {
    /// The exit key was held when events were drained.
    ExitKey,
    /// The [`CancelToken`] was triggered.
    Cancelled,
    /// The platform closed the window.
    Closed,
}

/// How long a drain may wait for events after a skipped frame.
///
/// A skipped frame never waits on vsync, so without this a minimized window
/// would spin the loop.
pub const IDLE_WAIT: Duration = Duration::from_millis(16);

/// Drain, draw, present; one iteration per frame.
pub struct FrameLoop {
    exit_key: Key,
    last_outcome: PresentOutcome,
    clock: FrameClock,
    stats: FrameStats,
    list: DrawList,
    presented: u64,
    skipped: u64,
}

impl FrameLoop {
    pub fn new(exit_key: Key) -> Self {
        Self {
            exit_key,
            last_outcome: PresentOutcome::Presented,
            clock: FrameClock::new(),
            stats: FrameStats::default(),
            list: DrawList::new(),
            presented: 0,
            skipped: 0,
        }
    }

    /// Frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// Runs until the exit key, cancellation, or window close.
    pub fn run<E, P, V>(
        &mut self,
        events: &mut E,
        presenter: &mut P,
        view: &mut V,
        cancel: &CancelToken,
    ) -> Result<LoopExit>
    where
        E: EventSource,
        P: Presenter,
        V: View,
    {
        log::info!("frame loop started (exit key: {})", self.exit_key);
        self.clock.reset();

        let exit = loop {
            if let Some(exit) = self.step(events, presenter, view, cancel)? {
                break exit;
            }
        };

        view.finish(exit);
        log::info!(
            "frame loop stopped: {exit:?} after {} frames ({} skipped)",
            self.presented,
            self.skipped
        );
        Ok(exit)
    }

    /// One iteration. Returns `Some` when the loop must stop; nothing is drawn then.
    pub fn step<E, P, V>(
        &mut self,
        events: &mut E,
        presenter: &mut P,
        view: &mut V,
        cancel: &CancelToken,
    ) -> Result<Option<LoopExit>>
    where
        E: EventSource,
        P: Presenter,
        V: View,
    {
        if cancel.is_cancelled() {
            return Ok(Some(LoopExit::Cancelled));
        }
        let timeout = match self.last_outcome {
            PresentOutcome::Presented => Duration::ZERO,
            PresentOutcome::Skipped => IDLE_WAIT,
        };
        if events.drain(timeout) == AppControl::Exit {
            return Ok(Some(LoopExit::Closed));
        }
        if events.key_down(self.exit_key) {
            return Ok(Some(LoopExit::ExitKey));
        }
        if let Some((w, h)) = events.take_resize() {
            presenter.resize(w, h);
        }

        let time = self.clock.tick();
        if let Some(report) = self.stats.record(time.dt) {
            log::debug!("{:.1} fps ({:.2} ms/frame)", report.fps, report.avg_frame_ms);
        }

        self.list.clear();
        view.draw(&mut self.list, time);

        let outcome = presenter.present(view.clear_color(), &mut self.list, view.fonts())?;
        match outcome {
            PresentOutcome::Presented => self.presented += 1,
            PresentOutcome::Skipped => self.skipped += 1,
        }
        self.last_outcome = outcome;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Rect;
    use crate::paint::{Color, SolidBrush};
    use crate::scene::ZIndex;
    use crate::text::FontSystem;
    use crate::time::FrameTime;

    #[derive(Default)]
    struct FakeEvents {
        held: Vec<Key>,
        closed: bool,
        resize: Option<(u32, u32)>,
        drains: u32,
        timeouts: Vec<Duration>,
    }

    impl EventSource for FakeEvents {
        fn drain(&mut self, timeout: Duration) -> AppControl {
            self.drains += 1;
            self.timeouts.push(timeout);
            if self.closed { AppControl::Exit } else { AppControl::Continue }
        }

        fn key_down(&self, key: Key) -> bool {
            self.held.contains(&key)
        }

        fn take_resize(&mut self) -> Option<(u32, u32)> {
            self.resize.take()
        }
    }

    #[derive(Default)]
    struct RecordingPresenter {
        presents: Vec<(Color, usize)>,
        resizes: Vec<(u32, u32)>,
        fail: bool,
        /// Frames to report as skipped before presenting again.
        skip: u32,
    }

    impl Presenter for RecordingPresenter {
        fn resize(&mut self, width: u32, height: u32) {
            self.resizes.push((width, height));
        }

        fn present(&mut self, clear: Color, list: &mut DrawList, _fonts: &FontSystem) -> Result<PresentOutcome> {
            if self.fail {
                anyhow::bail!("device lost");
            }
            if self.skip > 0 {
                self.skip -= 1;
                return Ok(PresentOutcome::Skipped);
            }
            self.presents.push((clear, list.items().len()));
            Ok(PresentOutcome::Presented)
        }
    }

    #[derive(Default)]
    struct CountingView {
        fonts: FontSystem,
        draws: u32,
        finished: Option<LoopExit>,
    }

    impl View for CountingView {
        fn clear_color(&self) -> Color {
            Color::CORNFLOWER_BLUE
        }

        fn fonts(&self) -> &FontSystem {
            &self.fonts
        }

        fn draw(&mut self, list: &mut DrawList, _time: FrameTime) {
            self.draws += 1;
            list.fill_rect(ZIndex::BACKGROUND, Rect::new(0.0, 0.0, 10.0, 10.0), &SolidBrush::new(Color::WHITE));
        }

        fn finish(&mut self, exit: LoopExit) {
            self.finished = Some(exit);
        }
    }

    #[test]
    fn one_step_presents_exactly_once() {
        let mut lp = FrameLoop::new(Key::Escape);
        let (mut ev, mut pr, mut view) = (FakeEvents::default(), RecordingPresenter::default(), CountingView::default());

        let out = lp.step(&mut ev, &mut pr, &mut view, &CancelToken::new()).unwrap();

        assert_eq!(out, None);
        assert_eq!(pr.presents, vec![(Color::CORNFLOWER_BLUE, 1)]);
        assert_eq!(view.draws, 1);
        assert_eq!(ev.drains, 1);
    }

    #[test]
    fn list_is_cleared_between_frames() {
        let mut lp = FrameLoop::new(Key::Escape);
        let (mut ev, mut pr, mut view) = (FakeEvents::default(), RecordingPresenter::default(), CountingView::default());
        let cancel = CancelToken::new();

        lp.step(&mut ev, &mut pr, &mut view, &cancel).unwrap();
        lp.step(&mut ev, &mut pr, &mut view, &cancel).unwrap();

        assert_eq!(pr.presents.len(), 2);
        assert_eq!(pr.presents[1].1, 1);
        assert_eq!(lp.presented(), 2);
    }

    #[test]
    fn held_exit_key_stops_before_drawing() {
        let mut lp = FrameLoop::new(Key::Escape);
        let mut ev = FakeEvents { held: vec![Key::Escape], ..Default::default() };
        let (mut pr, mut view) = (RecordingPresenter::default(), CountingView::default());

        let exit = lp.run(&mut ev, &mut pr, &mut view, &CancelToken::new()).unwrap();

        assert_eq!(exit, LoopExit::ExitKey);
        assert!(pr.presents.is_empty());
        assert_eq!(view.draws, 0);
        assert_eq!(view.finished, Some(LoopExit::ExitKey));
    }

    #[test]
    fn other_keys_never_stop_the_loop() {
        let mut lp = FrameLoop::new(Key::Escape);
        let mut ev = FakeEvents { held: vec![Key::Space, Key::Enter, Key::Unknown(42)], ..Default::default() };
        let (mut pr, mut view) = (RecordingPresenter::default(), CountingView::default());
        let cancel = CancelToken::new();

        for _ in 0..5 {
            assert_eq!(lp.step(&mut ev, &mut pr, &mut view, &cancel).unwrap(), None);
        }
        assert_eq!(pr.presents.len(), 5);
    }

    #[test]
    fn cancellation_stops_before_draining() {
        let mut lp = FrameLoop::new(Key::Escape);
        let (mut ev, mut pr, mut view) = (FakeEvents::default(), RecordingPresenter::default(), CountingView::default());
        let cancel = CancelToken::new();
        cancel.clone().cancel();

        let exit = lp.run(&mut ev, &mut pr, &mut view, &cancel).unwrap();

        assert_eq!(exit, LoopExit::Cancelled);
        assert_eq!(ev.drains, 0);
        assert_eq!(view.draws, 0);
    }

    #[test]
    fn closed_window_ends_the_loop() {
        let mut lp = FrameLoop::new(Key::Escape);
        let mut ev = FakeEvents { closed: true, ..Default::default() };
        let (mut pr, mut view) = (RecordingPresenter::default(), CountingView::default());

        assert_eq!(lp.run(&mut ev, &mut pr, &mut view, &CancelToken::new()).unwrap(), LoopExit::Closed);
    }

    #[test]
    fn resize_reaches_presenter_before_present() {
        let mut lp = FrameLoop::new(Key::Escape);
        let mut ev = FakeEvents { resize: Some((800, 600)), ..Default::default() };
        let (mut pr, mut view) = (RecordingPresenter::default(), CountingView::default());

        lp.step(&mut ev, &mut pr, &mut view, &CancelToken::new()).unwrap();

        assert_eq!(pr.resizes, vec![(800, 600)]);
        assert!(ev.resize.is_none());
    }

    #[test]
    fn presenter_failure_propagates() {
        let mut lp = FrameLoop::new(Key::Escape);
        let mut ev = FakeEvents::default();
        let mut pr = RecordingPresenter { fail: true, ..Default::default() };
        let mut view = CountingView::default();

        assert!(lp.run(&mut ev, &mut pr, &mut view, &CancelToken::new()).is_err());
    }

    #[test]
    fn skipped_frame_lets_the_next_drain_wait() {
        let mut lp = FrameLoop::new(Key::Escape);
        let mut ev = FakeEvents::default();
        let mut pr = RecordingPresenter { skip: 2, ..Default::default() };
        let mut view = CountingView::default();
        let cancel = CancelToken::new();

        for _ in 0..4 {
            lp.step(&mut ev, &mut pr, &mut view, &cancel).unwrap();
        }

        assert_eq!(ev.timeouts, vec![Duration::ZERO, IDLE_WAIT, IDLE_WAIT, Duration::ZERO]);
        assert_eq!(lp.presented(), 2);
    }
}
