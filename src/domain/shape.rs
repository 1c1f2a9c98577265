//! Shape capability and the two leaf primitives.

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::point::Point;

/// Capability shared by leaves and composites.
///
/// Both methods are pure functions of the shape's state.
pub trait Shape {
    /// True if `p` lies inside the shape's region.
    fn contains(&self, p: Point) -> bool;

    /// Deterministic human-readable description of the shape.
    fn describe(&self) -> String;
}

/// Circle with an exclusive boundary.
fn require_finite_center(center: Point) -> DomainResult<()> {
    if center.is_finite() {
        Ok(())
    } else {
        Err(DomainError::InvalidCenter {
            x: center.x(),
            y: center.y(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point,
    radius: f64,
}

impl Circle {
    /// The radius must be positive and its square finite, so `contains`
    /// can compare squared distances without overflowing.
    pub fn new(center: Point, radius: f64) -> DomainResult<Self> {
        require_finite_center(center)?;
        if !(radius > 0.0 && (radius * radius).is_finite()) {
            return Err(DomainError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Shape for Circle {
    fn contains(&self, p: Point) -> bool {
        p.distance_squared(self.center) < self.radius * self.radius
    }

    fn describe(&self) -> String {
        format!("Circle{{center({}), radius({})}}", self.center, self.radius)
    }
}

impl fmt::Display for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Axis-aligned rectangle, inclusive on all four edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    center: Point,
    half_extent: Point,
}

impl Rectangle {
    pub fn new(center: Point, half_extent: Point) -> DomainResult<Self> {
        require_finite_center(center)?;
        let (hx, hy) = (half_extent.x(), half_extent.y());
        if !half_extent.is_finite() || hx < 0.0 || hy < 0.0 {
            return Err(DomainError::InvalidHalfExtent { x: hx, y: hy });
        }
        Ok(Self {
            center,
            half_extent,
        })
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn half_extent(&self) -> Point {
        self.half_extent
    }
}

impl Shape for Rectangle {
    fn contains(&self, p: Point) -> bool {
        let (c, h) = (self.center, self.half_extent);
        p.x() >= c.x() - h.x()
            && p.x() <= c.x() + h.x()
            && p.y() >= c.y() - h.y()
            && p.y() <= c.y() + h.y()
    }

    fn describe(&self) -> String {
        format!(
            "Rectangle{{center({}), halfsize({})}}",
            self.center, self.half_extent
        )
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_circle_when_describing_then_matches_text_format() {
        let c = Circle::new(Point::new(1.0, 0.0), 1.0).unwrap();
        assert_eq!(c.describe(), "Circle{center(1, 0), radius(1)}");
    }

    #[test]
    fn given_rectangle_when_describing_then_matches_text_format() {
        let r = Rectangle::new(Point::ORIGIN, Point::new(0.5, 0.5)).unwrap();
        assert_eq!(r.describe(), "Rectangle{center(0, 0), halfsize(0.5, 0.5)}");
    }

    #[test]
    fn given_non_positive_radius_when_constructing_then_rejects() {
        assert_eq!(
            Circle::new(Point::ORIGIN, 0.0),
            Err(DomainError::InvalidRadius(0.0))
        );
        assert!(Circle::new(Point::ORIGIN, -1.0).is_err());
        assert!(Circle::new(Point::ORIGIN, f64::NAN).is_err());
    }

    #[test]
    fn given_negative_half_extent_when_constructing_then_rejects() {
        let err = Rectangle::new(Point::ORIGIN, Point::new(1.0, -0.1)).unwrap_err();
        assert!(err.is_invalid_argument());
        // zero extent is a degenerate but valid rectangle
        assert!(Rectangle::new(Point::ORIGIN, Point::ORIGIN).is_ok());
    }

    #[test]
    fn given_valid_shapes_when_reading_accessors_then_returns_constructor_values() {
        let c = Circle::new(Point::new(2.0, -1.0), 3.5).unwrap();
        assert_eq!(c.center(), Point::new(2.0, -1.0));
        assert_eq!(c.radius(), 3.5);

        let r = Rectangle::new(Point::new(-4.0, 0.5), Point::new(1.0, 2.0)).unwrap();
        assert_eq!(r.center(), Point::new(-4.0, 0.5));
        assert_eq!(r.half_extent(), Point::new(1.0, 2.0));
    }

    #[test]
    fn given_non_finite_center_when_constructing_then_rejects_both_shapes() {
        let nan = Point::new(f64::NAN, 0.0);
        let inf = Point::new(0.0, f64::INFINITY);

        assert!(matches!(
            Circle::new(nan, 1.0),
            Err(DomainError::InvalidCenter { .. })
        ));
        assert_eq!(
            Circle::new(inf, 1.0),
            Err(DomainError::InvalidCenter {
                x: 0.0,
                y: f64::INFINITY
            })
        );
        let err = Rectangle::new(nan, Point::new(1.0, 1.0)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidCenter { .. }));
        assert!(err.is_invalid_argument());
    }
}
