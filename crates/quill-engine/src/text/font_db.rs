use fontdb::{Database, Family, Query, Stretch, Style, Weight};

use super::FontError;

/// Raw face bytes resolved from the system font database.
#[derive(Debug, Clone)]
pub struct FaceData {
    /// Family name actually matched (may differ from the request after fallback).
    pub family: String,
    pub bytes: Vec<u8>,
    /// Face index inside a font collection.
    pub index: u32,
}

/// Thin wrapper over `fontdb::Database` used to turn family names into face bytes.
pub struct FontDatabase {
    db: Database,
}

impl FontDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self { db: Database::new() }
    }

    /// Creates a database populated with the platform's installed fonts.
    pub fn system() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("font database: {} faces discovered", db.len());
        Self { db }
    }

    /// Adds in-memory font data (useful for embedded fallbacks).
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
    }

    /// Number of faces known to the database.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Resolves `family` to a regular-weight, upright face.
    ///
    /// Resolution order:
    /// - the named family
    /// - generic sans-serif
    /// - the first face in the database
    pub fn resolve(&self, family: &str) -> Result<FaceData, FontError> {
        if self.db.is_empty() {
            return Err(FontError::NoFontsAvailable);
        }

        let query = |families: &[Family<'_>]| {
            self.db.query(&Query {
                families,
                weight: Weight::NORMAL,
                stretch: Stretch::Normal,
                style: Style::Normal,
            })
        };

        let id = query(&[Family::Name(family)])
            .or_else(|| {
                log::warn!("font family {family:?} not installed; falling back to sans-serif");
                query(&[Family::SansSerif])
            })
            .or_else(|| self.db.faces().next().map(|f| f.id))
            .ok_or_else(|| FontError::FamilyNotFound(family.to_string()))?;

        let matched = self
            .db
            .face(id)
            .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
            .unwrap_or_else(|| family.to_string());

        let (bytes, index) = self
            .db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or_else(|| FontError::FaceDataUnavailable(matched.clone()))?;

        Ok(FaceData { family: matched, bytes, index })
    }
}

impl Default for FontDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TEST_FONT;

    #[test]
    fn empty_database_reports_no_fonts() {
        let db = FontDatabase::new();
        assert_eq!(db.face_count(), 0);
        assert!(matches!(db.resolve("Segoe UI"), Err(FontError::NoFontsAvailable)));
    }

    #[test]
    fn missing_family_falls_back_to_a_loaded_face() {
        let mut db = FontDatabase::new();
        db.load_font_data(TEST_FONT.to_vec());
        assert_eq!(db.face_count(), 1);

        let face = db.resolve("Segoe UI").unwrap();
        assert_eq!(face.family, "Tuffy");
        assert_eq!(face.bytes.len(), TEST_FONT.len());
    }
}
