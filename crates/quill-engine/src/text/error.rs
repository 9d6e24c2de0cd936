use crate::text::FontId;

/// Errors raised while resolving, loading, or shaping fonts.
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("no fonts available in the font database")]
    NoFontsAvailable,

    #[error("font family {0:?} could not be resolved")]
    FamilyNotFound(String),

    #[error("font face data for {0:?} could not be read")]
    FaceDataUnavailable(String),

    #[error("font parse error: {0}")]
    Parse(String),

    #[error("unknown font id {0:?}")]
    UnknownFont(FontId),
}
