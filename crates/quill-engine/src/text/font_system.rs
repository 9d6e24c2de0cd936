use super::{FaceData, FontDatabase, FontError};

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// Owns a collection of parsed fonts.
///
/// Fonts are immutable after loading. The system is owned by the application
/// and passed to the text renderer each frame so new glyphs can be rasterized
/// on demand.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    ///
    /// `collection_index` selects the face inside a `.ttc` collection.
    pub fn load_font(&mut self, bytes: &[u8], collection_index: u32) -> Result<FontId, FontError> {
        let settings = fontdue::FontSettings {
            collection_index,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(bytes, settings)
            .map_err(|e| FontError::Parse(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        Ok(id)
    }

    /// Resolves `family` through `db` and loads the matched face.
    pub fn load_family(&mut self, db: &FontDatabase, family: &str) -> Result<FontId, FontError> {
        let FaceData { family: matched, bytes, index } = db.resolve(family)?;
        let id = self.load_font(&bytes, index)?;
        log::debug!("font {family:?} resolved to {matched:?} (face {index}) as {id:?}");
        Ok(id)
    }

    /// Returns the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    pub(crate) fn try_get(&self, id: FontId) -> Result<&fontdue::Font, FontError> {
        self.get(id).ok_or(FontError::UnknownFont(id))
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}
