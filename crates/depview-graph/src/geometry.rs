use serde::{Deserialize, Serialize};

/// An immutable 2D coordinate.
///
/// Updates never mutate in place: `translated` and `scaled` return fresh values, so a
/// point handed to one view can never be changed underneath another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Polar to Cartesian conversion.
    pub fn from_polar(radius: f32, theta: f32) -> Self {
        Self::new(radius * theta.cos(), radius * theta.sin())
    }

    pub fn translated(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn distance(self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A rectangle defined by min and max corners
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

impl Rect {
    /// Create a new rectangle from min and max corners
    pub fn from_min_max(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Create a new rectangle from position and size
    pub fn from_pos_size(pos: Point, width: f32, height: f32) -> Self {
        Self {
            min: pos,
            max: Point::new(pos.x + width, pos.y + height),
        }
    }

    /// Zero-size rectangle around a single point
    pub fn from_point(point: Point) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Smallest rectangle covering both `self` and `point`.
    pub fn including(&self, point: Point) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_updates_return_new_values() {
        let original = Point::new(1.0, 2.0);
        let moved = original.translated(3.0, -2.0);
        assert_eq!(original, Point::new(1.0, 2.0));
        assert_eq!(moved, Point::new(4.0, 0.0));
        assert_eq!(moved.scaled(0.5), Point::new(2.0, 0.0));
    }

    #[test]
    fn polar_conversion_lands_on_axes() {
        let p = Point::from_polar(2.0, std::f32::consts::FRAC_PI_2);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn rect_grows_to_include_points() {
        let rect = Rect::from_point(Point::new(1.0, 1.0))
            .including(Point::new(-1.0, 4.0))
            .including(Point::new(3.0, 0.0));
        assert_eq!(rect.min, Point::new(-1.0, 0.0));
        assert_eq!(rect.max, Point::new(3.0, 4.0));
        assert_eq!(rect.center(), Point::new(1.0, 2.0));
        assert!(rect.contains(Point::new(0.0, 3.0)));
        assert!(!rect.contains(Point::new(5.0, 3.0)));
    }
}
