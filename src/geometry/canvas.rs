//! Page canvas normalization.
//!
//! Every layer coordinate is expressed relative to the top-left corner of the
//! page's visible area. For pages displayed at a quarter turn the visual canvas
//! has its width and height swapped relative to the raw geometry.

use serde::{Deserialize, Serialize};

use super::{Point, Rect};

/// Page display rotation, in clockwise quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Rotation {
    /// 0 degrees
    #[default]
    None,
    /// 90 degrees
    Quarter,
    /// 180 degrees
    Half,
    /// 270 degrees
    ThreeQuarter,
}

impl Rotation {
    /// Convert a rotation angle in degrees.
    ///
    /// Negative and out-of-range angles are reduced modulo 360. Angles that
    /// are not a multiple of 90 snap to the nearest quarter turn.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::geometry::Rotation;
    ///
    /// assert_eq!(Rotation::from_degrees(-90), Rotation::ThreeQuarter);
    /// assert_eq!(Rotation::from_degrees(450), Rotation::Quarter);
    /// ```
    pub fn from_degrees(degrees: i32) -> Self {
        let normalized = degrees.rem_euclid(360);
        if normalized % 90 != 0 {
            log::warn!("Page rotation {} is not a multiple of 90, snapping", degrees);
        }
        match ((normalized + 45) / 90) % 4 {
            1 => Rotation::Quarter,
            2 => Rotation::Half,
            3 => Rotation::ThreeQuarter,
            _ => Rotation::None,
        }
    }

    /// Rotation angle in degrees (0, 90, 180 or 270).
    pub fn degrees(&self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    /// True for 90 and 270 degrees.
    pub fn swaps_axes(&self) -> bool {
        matches!(self, Rotation::Quarter | Rotation::ThreeQuarter)
    }
}

impl From<i32> for Rotation {
    fn from(degrees: i32) -> Self {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

/// Normalized page dimensions, post-rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Visual width
    pub width: f32,
    /// Visual height
    pub height: f32,
}

impl Canvas {
    /// Establish the canvas and coordinate origin for a page.
    ///
    /// Returns the canvas together with the origin offset every downstream
    /// coordinate must subtract.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::geometry::{Canvas, Rect, Rotation};
    ///
    /// let area = Rect::from_points(10.0, 20.0, 610.0, 820.0);
    /// let (canvas, origin) = Canvas::normalize(area, Rotation::Quarter);
    /// assert_eq!((canvas.width, canvas.height), (800.0, 600.0));
    /// assert_eq!((origin.x, origin.y), (10.0, 20.0));
    /// ```
    pub fn normalize(visible_area: Rect, rotation: Rotation) -> (Canvas, Point) {
        let canvas = if rotation.swaps_axes() {
            Canvas {
                width: visible_area.height,
                height: visible_area.width,
            }
        } else {
            Canvas {
                width: visible_area.width,
                height: visible_area.height,
            }
        };
        (canvas, visible_area.origin())
    }
}
