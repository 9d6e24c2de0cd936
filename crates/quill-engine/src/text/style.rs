use super::{FontDatabase, FontError, FontId, FontSystem};

/// Named font family plus size, resolved to a loaded font.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    family: String,
    font: FontId,
    size: f32,
}

impl TextStyle {
    /// Builds a style from an already-loaded font.
    pub fn new(family: impl Into<String>, font: FontId, size: f32) -> Self {
        Self { family: family.into(), font, size }
    }

    /// Resolves `family` through `db`, loads it into `fonts`, and returns the style.
    pub fn load(
        fonts: &mut FontSystem,
        db: &FontDatabase,
        family: &str,
        size: f32,
    ) -> Result<Self, FontError> {
        let font = fonts.load_family(db, family)?;
        Ok(Self::new(family, font, size))
    }

    /// Requested family name (before any fallback).
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn font(&self) -> FontId {
        self.font
    }

    /// Size in logical pixels.
    pub fn size(&self) -> f32 {
        self.size
    }
}
