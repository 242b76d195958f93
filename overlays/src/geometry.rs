//! Geometry value types shared by sizing and fly-in animation.

use serde::{Deserialize, Serialize};

/// Tolerance used when comparing sizes and durations.
pub const EPSILON: f32 = 0.0001;

/// Check if two values are equal within [`EPSILON`].
pub fn near(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}

/// Clamp `value` into `[min, max]`, letting `min` win when the bounds cross.
///
/// Small viewports can produce an upper bound below the minimum size; the
/// minimum is kept in that case instead of panicking like `f32::clamp`.
pub fn clamp_soft(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// A 2D vector in reference-viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A floating point size in reference-viewport units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeF {
    pub width: f32,
    pub height: f32,
}

impl SizeF {
    pub const ZERO: SizeF = SizeF {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Round both dimensions up to whole units.
    pub fn ceil(self) -> Self {
        Self::new(self.width.ceil(), self.height.ceil())
    }

    /// Component-wise difference (`self - other`).
    pub fn minus(self, other: SizeF) -> Self {
        Self::new(self.width - other.width, self.height - other.height)
    }

    /// Check if both dimensions are equal within [`EPSILON`].
    pub fn approx_eq(&self, other: &SizeF) -> bool {
        near(self.width, other.width) && near(self.height, other.height)
    }

    /// Check if both dimensions are strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl std::fmt::Display for SizeF {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_soft_prefers_min_when_bounds_cross() {
        assert_eq!(clamp_soft(50.0, 100.0, 80.0), 100.0);
        assert_eq!(clamp_soft(90.0, 10.0, 80.0), 80.0);
        assert_eq!(clamp_soft(5.0, 10.0, 80.0), 10.0);
    }

    #[test]
    fn test_size_ceil() {
        assert_eq!(SizeF::new(10.2, 3.0).ceil(), SizeF::new(11.0, 3.0));
    }

    #[test]
    fn test_near() {
        assert!(near(1.0, 1.00005));
        assert!(!near(1.0, 1.01));
    }
}
