//! World-space coordinates on the navigation plane.
//!
//! Tiles live on a flat plane, so positions are 2-D `f32` pairs.  The same
//! type doubles as a displacement / velocity vector.

use std::ops::{Add, AddAssign, Mul, Sub};

/// A point (or vector) on the navigation plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub const ZERO: WorldPos = WorldPos { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Vector length.
    #[inline]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Straight-line distance to `other`.
    #[inline]
    pub fn distance(self, other: WorldPos) -> f32 {
        (other - self).length()
    }

    /// Axis-aligned (L1) distance to `other`.
    #[inline]
    pub fn manhattan(self, other: WorldPos) -> f32 {
        (other.x - self.x).abs() + (other.y - self.y).abs()
    }

    /// Unit vector in the same direction, or `ZERO` for a zero-length vector.
    #[inline]
    pub fn normalized(self) -> WorldPos {
        let len = self.length();
        if len > f32::EPSILON {
            WorldPos::new(self.x / len, self.y / len)
        } else {
            WorldPos::ZERO
        }
    }

    /// `true` if both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for WorldPos {
    type Output = WorldPos;
    #[inline]
    fn add(self, rhs: WorldPos) -> WorldPos {
        WorldPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for WorldPos {
    #[inline]
    fn add_assign(&mut self, rhs: WorldPos) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for WorldPos {
    type Output = WorldPos;
    #[inline]
    fn sub(self, rhs: WorldPos) -> WorldPos {
        WorldPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for WorldPos {
    type Output = WorldPos;
    #[inline]
    fn mul(self, rhs: f32) -> WorldPos {
        WorldPos::new(self.x * rhs, self.y * rhs)
    }
}

impl std::fmt::Display for WorldPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
