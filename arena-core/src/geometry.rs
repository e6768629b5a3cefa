//! Points and sizes in base-surface coordinates.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A position (or offset) in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Pixels from the left.
    pub x: f32,
    /// Pixels from the top.
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Offset of the center from the top-left corner.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Check whether `point` lies in the closed box `[origin, origin + size]`.
#[must_use]
pub fn box_contains(origin: Point, size: Size, point: Point) -> bool {
    point.x >= origin.x
        && point.x <= origin.x + size.width
        && point.y >= origin.y
        && point.y <= origin.y + size.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_edges_are_inclusive() {
        let origin = Point::new(10.0, 10.0);
        let size = Size::new(20.0, 5.0);
        assert!(box_contains(origin, size, Point::new(10.0, 10.0)));
        assert!(box_contains(origin, size, Point::new(30.0, 15.0)));
        assert!(!box_contains(origin, size, Point::new(30.1, 15.0)));
        assert!(!box_contains(origin, size, Point::new(9.9, 12.0)));
    }
}
