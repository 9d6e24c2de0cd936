use super::Color;

/// Immutable solid-color fill used for both shapes and text.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolidBrush {
    color: Color,
}

impl SolidBrush {
    #[inline]
    pub const fn new(color: Color) -> Self {
        Self { color }
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }
}
