use std::rc::Rc;

use anyhow::{Context, Result};
use quill_engine::coords::Vec2;
use quill_engine::device::{ResourceTracker, Tracked};
use quill_engine::paint::{Color, SolidBrush};
use quill_engine::text::{FontDatabase, FontSystem, TextBlock, TextStyle};

pub const FONT_FAMILY: &str = "Segoe UI";
pub const FONT_SIZE: f32 = 24.0;
/// Wrap box of both moving text blocks.
pub const BLOCK_SIZE: Vec2 = Vec2::new(400.0, 200.0);

pub const SNAPPED_TEXT: &str =
    "This is an example of a moving TextLayout object with snapped pixel boundaries.";
pub const SMOOTH_TEXT: &str =
    "This is an example of a moving TextLayout object with no snapped pixel boundaries.";

/// Everything the scene draws with, created once before the loop starts.
///
/// Immutable after [`load`](Self::load). Fields are declared in reverse
/// acquisition order, so dropping the struct releases them newest first.
pub struct Resources {
    pub text_brush: Tracked<SolidBrush>,
    pub background_brush: Tracked<SolidBrush>,
    pub block_smooth: Tracked<Rc<TextBlock>>,
    pub block_snapped: Tracked<Rc<TextBlock>>,
    pub text_style: Tracked<TextStyle>,
    pub fonts: Tracked<FontSystem>,
}

impl Resources {
    /// Loads the text style, both text blocks and both brushes.
    ///
    /// Text blocks are shaped for `scale`, the surface's scale factor.
    /// On failure everything acquired so far is released before returning.
    pub fn load(db: &FontDatabase, tracker: &ResourceTracker, scale: f32) -> Result<Self> {
        let mut fonts = tracker.track("font system", FontSystem::new());

        let style = TextStyle::load(&mut fonts, db, FONT_FAMILY, FONT_SIZE)
            .with_context(|| format!("failed to load text style {FONT_FAMILY:?} {FONT_SIZE}px"))?;
        let text_style = tracker.track("text style", style);

        let block_snapped = TextBlock::new(&fonts, &text_style, SNAPPED_TEXT, BLOCK_SIZE, scale)
            .context("failed to shape snapped text block")?;
        let block_snapped = tracker.track("text block (snapped)", Rc::new(block_snapped));

        let block_smooth = TextBlock::new(&fonts, &text_style, SMOOTH_TEXT, BLOCK_SIZE, scale)
            .context("failed to shape smooth text block")?;
        let block_smooth = tracker.track("text block (smooth)", Rc::new(block_smooth));

        let background_brush = tracker.track("background brush", SolidBrush::new(Color::WHITE));
        let text_brush = tracker.track("text brush", SolidBrush::new(Color::BLACK));

        log::info!(
            "resources loaded: {:?} {}px, {} + {} glyphs",
            text_style.family(),
            text_style.size(),
            block_snapped.glyphs().len(),
            block_smooth.glyphs().len()
        );

        Ok(Self {
            text_brush,
            background_brush,
            block_smooth,
            block_snapped,
            text_style,
            fonts,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Database holding only the bundled Tuffy face.
    pub(crate) fn test_fonts() -> FontDatabase {
        let mut db = FontDatabase::new();
        db.load_font_data(include_bytes!("../../quill-engine/assets/fonts/Tuffy.ttf").to_vec());
        db
    }

    #[test]
    fn failed_load_releases_what_was_acquired() {
        let tracker = ResourceTracker::new();
        let result = Resources::load(&FontDatabase::new(), &tracker, 1.0);

        assert!(result.is_err());
        assert_eq!(tracker.live_count(), 0);
        assert_eq!(tracker.release_order(), vec!["font system"]);
    }

    #[test]
    fn drop_releases_in_reverse_acquisition_order() {
        let tracker = ResourceTracker::new();
        let resources = Resources::load(&test_fonts(), &tracker, 1.0).unwrap();
        assert_eq!(tracker.live_count(), 6);
        assert_eq!(resources.block_snapped.text(), SNAPPED_TEXT);
        assert_eq!(resources.block_smooth.layout_size(), BLOCK_SIZE);
        assert!(!resources.block_snapped.glyphs().is_empty());

        drop(resources);

        assert_eq!(tracker.live_count(), 0);
        assert_eq!(
            tracker.release_order(),
            vec![
                "text brush",
                "background brush",
                "text block (smooth)",
                "text block (snapped)",
                "text style",
                "font system",
            ]
        );
    }
}
