use crate::coords::Vec2;

use super::{FontError, FontSystem, MeasuringMode, ShapedGlyph, Shaper, TextStyle};

/// Paragraph shaped once at creation and drawn many times.
///
/// Glyph positions are relative to the block's top-left; the draw origin is
/// supplied per draw call, so moving a block never reshapes it. Glyphs are
/// rasterized for the `scale` the block was shaped at; the text renderer
/// reshapes a block drawn at another scale factor.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    text: String,
    style: TextStyle,
    layout_size: Vec2,
    scale: f32,
    glyphs: Vec<ShapedGlyph>,
}

impl TextBlock {
    /// Shapes `text` with `style`, wrapping inside a `layout_size` box, for a
    /// surface with the given logical-to-physical `scale`.
    pub fn new(
        fonts: &FontSystem,
        style: &TextStyle,
        text: impl Into<String>,
        layout_size: Vec2,
        scale: f32,
    ) -> Result<Self, FontError> {
        let text = text.into();
        let font = fonts.try_get(style.font())?;
        let glyphs = Shaper::new().shape(
            font,
            &text,
            style.size(),
            layout_size,
            MeasuringMode::Natural,
            scale,
        );

        log::debug!(
            "text block shaped: {} glyphs in {}x{} box",
            glyphs.len(),
            layout_size.x,
            layout_size.y
        );

        Ok(Self { text, style: style.clone(), layout_size, scale, glyphs })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn style(&self) -> &TextStyle {
        &self.style
    }

    pub fn layout_size(&self) -> Vec2 {
        self.layout_size
    }

    /// Scale factor the glyphs were shaped for.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn glyphs(&self) -> &[ShapedGlyph] {
        &self.glyphs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{FontId, TEST_FONT};

    #[test]
    fn shaping_with_unknown_font_fails() {
        let fonts = FontSystem::new();
        let style = TextStyle::new("Segoe UI", FontId(0), 24.0);
        let err = TextBlock::new(&fonts, &style, "hello", Vec2::new(400.0, 200.0), 1.0).unwrap_err();
        assert!(matches!(err, FontError::UnknownFont(_)));
    }

    #[test]
    fn block_keeps_its_text_box_and_scale() {
        let mut fonts = FontSystem::new();
        let font = fonts.load_font(TEST_FONT, 0).unwrap();
        let style = TextStyle::new("Tuffy", font, 24.0);

        let block = TextBlock::new(&fonts, &style, "moving text", Vec2::new(400.0, 200.0), 2.0).unwrap();

        assert_eq!(block.text(), "moving text");
        assert_eq!(block.scale(), 2.0);
        assert_eq!(block.glyphs().len(), "movingtext".len());
        assert!(block.glyphs().iter().all(|g| g.key.px == 48.0));
    }
}
