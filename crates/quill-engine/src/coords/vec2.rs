use core::ops::Add;

/// 2D vector in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Rounds both components to the nearest whole physical pixel for the given
    /// logical-to-physical `scale`, returning the result in logical pixels.
    #[inline]
    pub fn snapped(self, scale: f32) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        Vec2::new((self.x * scale).round() / scale, (self.y * scale).round() / scale)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapped_rounds_to_whole_pixels_at_unit_scale() {
        assert_eq!(Vec2::new(300.4, 349.6).snapped(1.0), Vec2::new(300.0, 350.0));
    }

    #[test]
    fn snapped_uses_physical_grid_at_high_dpi() {
        // At 2x, half-pixel logical positions are whole physical pixels.
        assert_eq!(Vec2::new(10.5, 20.25).snapped(2.0), Vec2::new(10.5, 20.5));
    }

    #[test]
    fn snapped_treats_non_positive_scale_as_one() {
        assert_eq!(Vec2::new(1.4, 1.6).snapped(0.0), Vec2::new(1.0, 2.0));
    }
}
