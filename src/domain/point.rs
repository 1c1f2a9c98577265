//! Two-dimensional point used by every shape.

use std::fmt;
use std::ops::{Add, Sub};

/// Immutable pair of coordinates. Equality is by value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Squared Euclidean distance to `other`.
    pub fn distance_squared(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Formats as `x, y`, the form used inside shape descriptions.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_two_points_when_subtracting_then_returns_component_difference() {
        let d = Point::new(3.0, 4.0) - Point::new(1.0, 1.0);
        assert_eq!(d, Point::new(2.0, 3.0));
        assert_eq!(Point::ORIGIN.distance_squared(Point::new(3.0, 4.0)), 25.0);
    }

    #[test]
    fn given_whole_and_fractional_coordinates_when_displaying_then_uses_natural_decimals() {
        assert_eq!(Point::new(1.0, 0.0).to_string(), "1, 0");
        assert_eq!(Point::new(0.5, -2.25).to_string(), "0.5, -2.25");
    }
}
