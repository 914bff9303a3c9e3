//! Geometric primitives for layer reconstruction.
//!
//! This module provides the basic point/rectangle types shared by every
//! builder, plus the [`canvas`] normalizer that fixes the page coordinate frame.

pub mod canvas;

pub use canvas::{Canvas, Rotation};

use serde::{Deserialize, Serialize};

/// A 2D point in page space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point {
    /// Create a new point.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::geometry::Point;
    ///
    /// let point = Point::new(10.0, 20.0);
    /// assert_eq!(point.x, 10.0);
    /// assert_eq!(point.y, 20.0);
    /// ```
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Express this point relative to `origin`.
    pub fn relative_to(&self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// A rectangle with a top-left origin.
///
/// Serializes as flat `x`, `y`, `width`, `height` fields so it can be
/// flattened into a layer record.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate of top-left corner
    pub x: f32,
    /// Y coordinate of top-left corner
    pub y: f32,
    /// Width of rectangle
    pub width: f32,
    /// Height of rectangle
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle from position and dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from two corner points.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::geometry::Rect;
    ///
    /// let rect = Rect::from_points(10.0, 20.0, 110.0, 70.0);
    /// assert_eq!(rect.x, 10.0);
    /// assert_eq!(rect.y, 20.0);
    /// assert_eq!(rect.width, 100.0);
    /// assert_eq!(rect.height, 50.0);
    /// ```
    pub fn from_points(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Get the left edge x-coordinate.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Get the right edge x-coordinate.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Get the top edge y-coordinate.
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Get the bottom edge y-coordinate.
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Compute the area of the rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::geometry::Rect;
    ///
    /// let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
    /// assert_eq!(rect.area(), 5000.0);
    /// ```
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Shift the rectangle so that `origin` becomes (0, 0).
    pub fn relative_to(&self, origin: Point) -> Rect {
        Rect::new(self.x - origin.x, self.y - origin.y, self.width, self.height)
    }

    /// Check whether `inner` lies inside this rectangle, allowing each edge
    /// of `inner` to stick out by up to `tolerance`.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::geometry::Rect;
    ///
    /// let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
    /// assert!(outer.contains_within(&Rect::new(-1.5, 10.0, 50.0, 50.0), 2.0));
    /// assert!(!outer.contains_within(&Rect::new(-2.5, 10.0, 50.0, 50.0), 2.0));
    /// ```
    pub fn contains_within(&self, inner: &Rect, tolerance: f32) -> bool {
        inner.left() >= self.left() - tolerance
            && inner.top() >= self.top() - tolerance
            && inner.right() <= self.right() + tolerance
            && inner.bottom() <= self.bottom() + tolerance
    }
}

/// Check whether the closed intervals `[a0, a1]` and `[b0, b1]` share any point.
///
/// Touching intervals count as overlapping.
pub fn spans_overlap(a0: f32, a1: f32, b0: f32, b1: f32) -> bool {
    !(a1 < b0 || a0 > b1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_from_points() {
        let r = Rect::from_points(10.0, 20.0, 110.0, 70.0);
        assert_eq!(r.x, 10.0);
        assert_eq!(r.y, 20.0);
        assert_eq!(r.width, 100.0);
        assert_eq!(r.height, 50.0);
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 110.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 70.0);
    }

    #[test]
    fn test_rect_relative_to() {
        let r = Rect::new(30.0, 40.0, 10.0, 10.0).relative_to(Point::new(10.0, 15.0));
        assert_eq!(r, Rect::new(20.0, 25.0, 10.0, 10.0));
    }

    #[test]
    fn test_contains_within_tolerance() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_within(&Rect::new(0.0, 0.0, 100.0, 100.0), 0.0));
        assert!(outer.contains_within(&Rect::new(1.0, 1.0, 101.0, 101.0), 2.0));
        assert!(!outer.contains_within(&Rect::new(1.0, 1.0, 102.0, 10.0), 2.0));
        assert!(!outer.contains_within(&Rect::new(0.0, -3.0, 10.0, 10.0), 2.0));
    }

    #[test]
    fn test_spans_overlap() {
        assert!(spans_overlap(0.0, 10.0, 5.0, 15.0));
        assert!(spans_overlap(0.0, 10.0, 10.0, 15.0));
        assert!(!spans_overlap(0.0, 10.0, 10.5, 15.0));
        assert!(spans_overlap(5.0, 6.0, 0.0, 100.0));
    }

    #[test]
    fn test_rect_serializes_flat() {
        let json = serde_json::to_value(Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["height"], 4.0);
    }
}
