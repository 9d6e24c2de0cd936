/// Strategy for computing glyph positions.
///
/// - `Natural` keeps fractional advances and fractional glyph origins.
/// - `GdiClassic` rounds the em size to whole pixels and places every glyph
///   on a whole pixel (legacy-compatible metrics).
/// - `GdiNatural` keeps the fractional em size but places every glyph on a
///   whole pixel.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum MeasuringMode {
    #[default]
    Natural,
    GdiClassic,
    GdiNatural,
}

impl MeasuringMode {
    pub const ALL: [MeasuringMode; 3] =
        [MeasuringMode::Natural, MeasuringMode::GdiClassic, MeasuringMode::GdiNatural];

    /// Pixel size used for shaping and rasterization.
    #[inline]
    pub fn em_size(self, size: f32) -> f32 {
        match self {
            MeasuringMode::GdiClassic => size.round().max(1.0),
            MeasuringMode::Natural | MeasuringMode::GdiNatural => size,
        }
    }

    /// Applied by the shaper to advances, kerning and baselines.
    #[inline]
    pub fn place(self, v: f32) -> f32 {
        match self {
            MeasuringMode::Natural => v,
            MeasuringMode::GdiClassic | MeasuringMode::GdiNatural => v.round(),
        }
    }

    /// Human-readable label, as shown by the demo.
    pub fn label(self) -> &'static str {
        match self {
            MeasuringMode::Natural => "Natural",
            MeasuringMode::GdiClassic => "GDI classic",
            MeasuringMode::GdiNatural => "GDI natural",
        }
    }
}

/// Per-draw text options.
///
/// `clip` restricts output to the layout rectangle. `snap` rounds the text
/// origin to whole physical pixels; turning it off gives smooth sub-pixel
/// motion for animated text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DrawTextOptions {
    pub clip: bool,
    pub snap: bool,
}

impl DrawTextOptions {
    pub const NONE: DrawTextOptions = DrawTextOptions { clip: false, snap: true };
    pub const CLIP: DrawTextOptions = DrawTextOptions { clip: true, snap: true };
    pub const NO_SNAP: DrawTextOptions = DrawTextOptions { clip: false, snap: false };
}

impl Default for DrawTextOptions {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gdi_classic_rounds_em_size() {
        assert_eq!(MeasuringMode::GdiClassic.em_size(24.4), 24.0);
        assert_eq!(MeasuringMode::GdiClassic.em_size(0.2), 1.0);
        assert_eq!(MeasuringMode::GdiNatural.em_size(24.4), 24.4);
        assert_eq!(MeasuringMode::Natural.em_size(24.4), 24.4);
    }

    #[test]
    fn natural_keeps_fractional_positions() {
        assert_eq!(MeasuringMode::Natural.place(12.3), 12.3);
    }

    #[test]
    fn gdi_modes_place_on_whole_pixels() {
        assert_eq!(MeasuringMode::GdiClassic.place(12.6), 13.0);
        assert_eq!(MeasuringMode::GdiNatural.place(12.4), 12.0);
    }

    #[test]
    fn labels_are_distinct() {
        let labels: std::collections::HashSet<_> =
            MeasuringMode::ALL.iter().map(|m| m.label()).collect();
        assert_eq!(labels.len(), 3);
    }

    #[test]
    fn default_options_snap_without_clipping() {
        assert_eq!(DrawTextOptions::default(), DrawTextOptions { clip: false, snap: true });
    }
}
