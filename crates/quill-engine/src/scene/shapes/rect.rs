use crate::coords::Rect;
use crate::paint::{Color, SolidBrush};
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Solid rectangle draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub color: Color,
}

impl DrawList {
    /// Records a rectangle filled with `brush`.
    #[inline]
    pub fn fill_rect(&mut self, z: ZIndex, rect: Rect, brush: &SolidBrush) {
        self.push(z, DrawCmd::Rect(RectCmd { rect, color: brush.color() }));
    }
}
