use quill_engine::coords::{Rect, Vec2};
use quill_engine::core::{LoopExit, View};
use quill_engine::paint::Color;
use quill_engine::scene::{DrawList, ZIndex};
use quill_engine::text::{DrawTextOptions, FontSystem, MeasuringMode};
use quill_engine::time::FrameTime;

use crate::config::AnimationStep;
use crate::resources::Resources;

/// Peak vertical displacement of the moving text blocks.
pub const AMPLITUDE: f32 = 50.0;

pub const CLIPPED_TEXT: &str = "This text is long enough to overflow the designed region but will be clipped to the containing rectangle. Lorem ipsum dolor sit amet, consectetur adipiscing elit. ";
pub const OVERFLOW_TEXT: &str = "However, this other text isn't going to be clipped: Lorem ipsum dolor sit amet, consectetur adipiscing elit. Aenean gravida dui id accumsan dictum.";

const CLIPPED_RECT: Rect = Rect::new(50.0, 50.0, 200.0, 200.0);
const OVERFLOW_RECT: Rect = Rect::new(50.0, 300.0, 200.0, 200.0);
const MODES_RECT: Rect = Rect::new(300.0, 50.0, 400.0, 200.0);
const MODE_LINE_STEP: f32 = 30.0;
const SNAPPED_BACKGROUND: Rect = Rect::new(300.0, 300.0, 400.0, 200.0);
const SMOOTH_BACKGROUND: Rect = Rect::new(750.0, 300.0, 400.0, 200.0);
const BLOCK_Y: f32 = 350.0;

/// Mutable per-loop state, threaded through every frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LoopState {
    /// Animation accumulator; only ever increases.
    pub phase: f64,
    pub running: bool,
}

impl LoopState {
    pub fn new() -> Self {
        Self { phase: 0.0, running: true }
    }

    /// State for the next frame.
    pub fn advanced(self, step: AnimationStep, dt: f32) -> Self {
        Self { phase: self.phase + f64::from(step.increment(dt)), ..self }
    }
}

impl Default for LoopState {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertical offset of the moving blocks for `phase`.
#[inline]
pub fn vertical_offset(phase: f64) -> f32 {
    phase.cos() as f32 * AMPLITUDE
}

/// Records the four demo regions for one frame.
pub fn draw_scene(res: &Resources, state: &LoopState, list: &mut DrawList) {
    let z = ZIndex::CONTENT;
    let style = &*res.text_style;

    // Clipped.
    list.fill_rect(ZIndex::BACKGROUND, CLIPPED_RECT, &res.background_brush);
    list.draw_text(z, CLIPPED_TEXT, style, CLIPPED_RECT, &res.text_brush, DrawTextOptions::CLIP, MeasuringMode::Natural);

    // Overflowing.
    list.fill_rect(ZIndex::BACKGROUND, OVERFLOW_RECT, &res.background_brush);
    list.draw_text(z, OVERFLOW_TEXT, style, OVERFLOW_RECT, &res.text_brush, DrawTextOptions::NONE, MeasuringMode::Natural);

    // Measuring modes, one line each.
    list.fill_rect(ZIndex::BACKGROUND, MODES_RECT, &res.background_brush);
    for (i, mode) in MeasuringMode::ALL.into_iter().enumerate() {
        let line = MODES_RECT.translated(Vec2::new(0.0, i as f32 * MODE_LINE_STEP));
        let label = format!("MeasuringMode: {}", mode.label());
        list.draw_text(z, label, style, line, &res.text_brush, DrawTextOptions::NONE, mode);
    }

    // Moving blocks, snapped and unsnapped.
    let offset = vertical_offset(state.phase);

    list.fill_rect(ZIndex::BACKGROUND, SNAPPED_BACKGROUND, &res.background_brush);
    list.draw_text_block(
        z,
        &res.block_snapped,
        Vec2::new(SNAPPED_BACKGROUND.origin.x, BLOCK_Y + offset),
        &res.text_brush,
        DrawTextOptions::NONE,
    );

    list.fill_rect(ZIndex::BACKGROUND, SMOOTH_BACKGROUND, &res.background_brush);
    list.draw_text_block(
        z,
        &res.block_smooth,
        Vec2::new(SMOOTH_BACKGROUND.origin.x, BLOCK_Y + offset),
        &res.text_brush,
        DrawTextOptions::NO_SNAP,
    );
}

/// The renderer-loop view: draws [`draw_scene`] and advances the phase.
pub struct DemoView<'r> {
    resources: &'r Resources,
    state: LoopState,
    step: AnimationStep,
}

impl<'r> DemoView<'r> {
    pub fn new(resources: &'r Resources, step: AnimationStep) -> Self {
        Self { resources, state: LoopState::new(), step }
    }
}

impl View for DemoView<'_> {
    fn clear_color(&self) -> Color {
        Color::CORNFLOWER_BLUE
    }

    fn fonts(&self) -> &FontSystem {
        &self.resources.fonts
    }

    fn draw(&mut self, list: &mut DrawList, time: FrameTime) {
        debug_assert!(self.state.running, "drawing after the loop stopped");
        draw_scene(self.resources, &self.state, list);
        self.state = self.state.advanced(self.step, time.dt);
    }

    fn finish(&mut self, exit: LoopExit) {
        self.state.running = false;
        log::debug!("view finished ({exit:?}) at phase {:.3}", self.state.phase);
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use quill_engine::device::ResourceTracker;
    use quill_engine::scene::DrawCmd;

    use super::*;
    use crate::config::FIXED_STEP;
    use crate::resources::tests::test_fonts;

    #[test]
    fn offset_peaks_at_zero_and_bottoms_at_pi() {
        assert_eq!(vertical_offset(0.0), 50.0);
        assert!((vertical_offset(PI) + 50.0).abs() < 1e-4);
    }

    #[test]
    fn fixed_phase_strictly_increases() {
        let mut state = LoopState::new();
        let mut prev = state.phase;
        for _ in 0..120 {
            state = state.advanced(AnimationStep::Fixed(FIXED_STEP), 0.25);
            assert!(state.phase > prev);
            prev = state.phase;
        }
        assert!((state.phase - 2.0).abs() < 1e-4);
        assert!(state.running);
    }

    #[test]
    fn phase_keeps_moving_after_long_uptime() {
        // About 145 hours at 60 fps.
        let state = LoopState { phase: 524_288.0, running: true };
        let next = state.advanced(AnimationStep::Fixed(FIXED_STEP), 0.0);
        assert!(next.phase > state.phase);
    }

    #[test]
    fn elapsed_phase_follows_frame_time() {
        let state = LoopState::new().advanced(AnimationStep::Elapsed, 0.1);
        assert!((state.phase - 0.1).abs() < 1e-6);
    }

    fn load() -> (ResourceTracker, Resources) {
        let tracker = ResourceTracker::new();
        let res = Resources::load(&test_fonts(), &tracker, 1.0).unwrap();
        (tracker, res)
    }

    #[test]
    fn scene_records_every_region() {
        let (_tracker, res) = load();
        let mut list = DrawList::new();
        draw_scene(&res, &LoopState::new(), &mut list);

        let rects = list.items().iter().filter(|i| matches!(i.cmd, DrawCmd::Rect(_))).count();
        let texts = list.items().iter().filter(|i| matches!(i.cmd, DrawCmd::Text(_))).count();
        let blocks = list.items().iter().filter(|i| matches!(i.cmd, DrawCmd::TextBlock(_))).count();
        assert_eq!((rects, texts, blocks), (5, 5, 2));
    }

    #[test]
    fn only_the_first_region_is_clipped() {
        let (_tracker, res) = load();
        let mut list = DrawList::new();
        draw_scene(&res, &LoopState::new(), &mut list);

        let clipped: Vec<_> = list.items().iter().filter_map(|i| i.clip_rect).collect();
        assert_eq!(clipped, vec![CLIPPED_RECT]);
    }

    #[test]
    fn blocks_move_together_and_differ_only_in_snapping() {
        let (_tracker, res) = load();
        let mut list = DrawList::new();
        draw_scene(&res, &LoopState { phase: PI, running: true }, &mut list);

        let blocks: Vec<_> = list
            .items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::TextBlock(b) => Some(b),
                _ => None,
            })
            .collect();

        assert_eq!(blocks.len(), 2);
        assert!((blocks[0].origin.y - 300.0).abs() < 1e-3);
        assert_eq!(blocks[0].origin.y, blocks[1].origin.y);
        assert_eq!(blocks[0].origin.x, 300.0);
        assert_eq!(blocks[1].origin.x, 750.0);
        assert!(blocks[0].options.snap);
        assert!(!blocks[1].options.snap);
    }

    #[test]
    fn measuring_lines_use_each_mode_once() {
        let (_tracker, res) = load();
        let mut list = DrawList::new();
        draw_scene(&res, &LoopState::new(), &mut list);

        let lines: Vec<_> = list
            .items()
            .iter()
            .filter_map(|i| match &i.cmd {
                DrawCmd::Text(t) if t.text.starts_with("MeasuringMode") => Some((t.mode, t.layout_rect.origin.y)),
                _ => None,
            })
            .collect();

        assert_eq!(
            lines,
            vec![
                (MeasuringMode::Natural, 50.0),
                (MeasuringMode::GdiClassic, 80.0),
                (MeasuringMode::GdiNatural, 110.0),
            ]
        );
    }
}
