/// Z-ordering key for draw items.
///
/// Higher values appear on top of lower values.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ZIndex(pub i32);

impl ZIndex {
    /// Backgrounds and fills.
    pub const BACKGROUND: ZIndex = ZIndex(0);
    /// Text drawn over backgrounds.
    pub const CONTENT: ZIndex = ZIndex(1);
}
