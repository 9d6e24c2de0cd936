use fontdue::layout::{CoordinateSystem, GlyphRasterConfig, Layout, LayoutSettings, TextStyle as RunStyle};

use crate::coords::Vec2;

use super::MeasuringMode;

/// One positioned glyph, relative to the top-left of its layout box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ShapedGlyph {
    /// Rasterization key: font, glyph index and physical pixel size.
    pub key: GlyphRasterConfig,
    /// Top-left of the glyph bitmap relative to the layout origin, in logical px.
    pub offset: Vec2,
    /// Bitmap size in logical px.
    pub size: Vec2,
}

/// Reusable shaper built on `fontdue::layout::Layout`.
///
/// fontdue decides where lines break. Positions along each line come from
/// the font's unrounded advances and kerning; the measuring mode decides what
/// gets rounded.
///
/// Shaping happens in physical pixels (`size * scale`) so glyphs rasterize
/// at the density they are displayed at. Results are returned in logical px.
pub struct Shaper {
    layout: Layout<()>,
}

impl Shaper {
    pub fn new() -> Self {
        Self { layout: Layout::new(CoordinateSystem::PositiveYDown) }
    }

    /// Shapes `text` and appends the visible glyphs to `out`.
    ///
    /// Wraps at `layout_size.x`. Text may extend below `layout_size.y`;
    /// overflow is handled by clipping, not here.
    #[allow(clippy::too_many_arguments)]
    pub fn shape_into(
        &mut self,
        font: &fontdue::Font,
        text: &str,
        size: f32,
        layout_size: Vec2,
        mode: MeasuringMode,
        scale: f32,
        out: &mut Vec<ShapedGlyph>,
    ) {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        let px = mode.em_size(size * scale);

        self.layout.reset(&LayoutSettings {
            max_width: (layout_size.x > 0.0).then_some(layout_size.x * scale),
            ..LayoutSettings::default()
        });
        self.layout.append(&[font], &RunStyle::new(text, px, 0));

        let Some(lines) = self.layout.lines() else { return };
        let glyphs = self.layout.glyphs();
        let line_metrics = font.horizontal_line_metrics(px);

        for (row, line) in lines.iter().enumerate() {
            let baseline = match line_metrics {
                Some(m) => m.ascent + row as f32 * m.new_line_size,
                None => line.baseline_y,
            };
            let baseline = mode.place(baseline);

            let mut pen = 0.0f32;
            let mut prev: Option<u16> = None;

            for g in glyphs.get(line.glyph_start..=line.glyph_end).unwrap_or(&[]) {
                if g.char_data.is_control() {
                    prev = None;
                    continue;
                }

                let index = g.key.glyph_index;
                if let Some(left) = prev {
                    pen += mode.place(font.horizontal_kern_indexed(left, index, px).unwrap_or(0.0));
                }

                let metrics = font.metrics_indexed(index, px);
                if g.char_data.rasterize() && metrics.width > 0 && metrics.height > 0 {
                    // Bitmap edges sit on whole pixels relative to the pen.
                    let x = pen + metrics.xmin as f32;
                    let y = baseline - (metrics.ymin + metrics.height as i32) as f32;
                    out.push(ShapedGlyph {
                        key: g.key,
                        offset: Vec2::new(x / scale, y / scale),
                        size: Vec2::new(metrics.width as f32 / scale, metrics.height as f32 / scale),
                    });
                }

                pen += mode.place(metrics.advance_width);
                prev = Some(index);
            }
        }
    }

    /// Convenience wrapper returning a fresh glyph list.
    pub fn shape(
        &mut self,
        font: &fontdue::Font,
        text: &str,
        size: f32,
        layout_size: Vec2,
        mode: MeasuringMode,
        scale: f32,
    ) -> Vec<ShapedGlyph> {
        let mut out = Vec::new();
        self.shape_into(font, text, size, layout_size, mode, scale, &mut out);
        out
    }
}

impl Default for Shaper {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TEST_FONT;

    const LINE: &str = "MeasuringMode: GDI natural";
    const WIDE: Vec2 = Vec2::new(400.0, 200.0);

    fn font() -> fontdue::Font {
        fontdue::Font::from_bytes(TEST_FONT, fontdue::FontSettings::default()).unwrap()
    }

    fn is_whole(v: f32) -> bool {
        (v - v.round()).abs() < 1e-4
    }

    fn offsets(glyphs: &[ShapedGlyph]) -> Vec<Vec2> {
        glyphs.iter().map(|g| g.offset).collect()
    }

    #[test]
    fn natural_keeps_fractional_glyph_origins() {
        let glyphs = Shaper::new().shape(&font(), LINE, 24.0, WIDE, MeasuringMode::Natural, 1.0);

        assert!(!glyphs.is_empty());
        let fractional = glyphs.iter().filter(|g| !is_whole(g.offset.x)).count();
        assert!(fractional > 0, "every natural origin landed on a whole pixel");
    }

    #[test]
    fn gdi_modes_place_glyphs_on_whole_pixels() {
        let font = font();
        for mode in [MeasuringMode::GdiClassic, MeasuringMode::GdiNatural] {
            let glyphs = Shaper::new().shape(&font, LINE, 23.5, WIDE, mode, 1.0);
            assert!(!glyphs.is_empty());
            assert!(
                glyphs.iter().all(|g| is_whole(g.offset.x) && is_whole(g.offset.y)),
                "{mode:?} produced a fractional origin"
            );
        }
    }

    #[test]
    fn natural_layout_differs_from_both_gdi_modes() {
        let font = font();
        let mut shaper = Shaper::new();
        let natural = shaper.shape(&font, LINE, 24.0, WIDE, MeasuringMode::Natural, 1.0);
        let classic = shaper.shape(&font, LINE, 24.0, WIDE, MeasuringMode::GdiClassic, 1.0);
        let hybrid = shaper.shape(&font, LINE, 24.0, WIDE, MeasuringMode::GdiNatural, 1.0);

        assert_eq!(natural.len(), classic.len());
        assert_eq!(natural.len(), hybrid.len());
        assert_ne!(offsets(&natural), offsets(&classic));
        assert_ne!(offsets(&natural), offsets(&hybrid));
    }

    #[test]
    fn gdi_classic_rasterizes_at_a_whole_em_size() {
        let glyphs = Shaper::new().shape(&font(), LINE, 23.4, WIDE, MeasuringMode::GdiClassic, 1.0);
        assert!(glyphs.iter().all(|g| g.key.px == 23.0));
    }

    #[test]
    fn long_text_wraps_inside_the_box() {
        let text = "This is an example of a moving TextLayout object with snapped pixel boundaries.";
        let glyphs = Shaper::new().shape(&font(), text, 24.0, WIDE, MeasuringMode::Natural, 1.0);

        // Anything starting below one em sits on a later line.
        assert!(glyphs.iter().any(|g| g.offset.y > 24.0), "text did not wrap");
        assert!(glyphs.iter().all(|g| g.offset.x + g.size.x <= WIDE.x + 1.0));
    }

    #[test]
    fn high_dpi_rasterizes_at_physical_size() {
        let font = font();
        let mut shaper = Shaper::new();
        let logical = shaper.shape(&font, "Hello", 24.0, WIDE, MeasuringMode::Natural, 1.0);
        let doubled = shaper.shape(&font, "Hello", 24.0, WIDE, MeasuringMode::Natural, 2.0);

        assert_eq!(logical.len(), doubled.len());
        assert!(doubled.iter().all(|g| g.key.px == 48.0));
        for (a, b) in logical.iter().zip(&doubled) {
            assert!((a.offset.x - b.offset.x).abs() <= 1.0, "{a:?} vs {b:?}");
            assert!((a.size.y - b.size.y).abs() <= 1.0, "{a:?} vs {b:?}");
        }
    }
}
