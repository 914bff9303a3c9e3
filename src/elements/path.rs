//! Path layer payload and path-data formatting.
//!
//! Path data uses the SVG mini-language subset `M`, `L`, `C` and `Z`, with
//! coordinates relative to the layer's own top-left corner.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// A vector shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathLayer {
    /// Path data (`M x y L x y C x1 y1, x2 y2, x3 y3 Z`)
    pub d: String,
    /// Fill color or `"transparent"`
    pub fill: String,
    /// Stroke color or `"transparent"`
    pub stroke: String,
    /// Stroke width in points
    pub stroke_width: f32,
}

/// One path-data command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Move to a point (M)
    MoveTo(Point),
    /// Line to a point (L)
    LineTo(Point),
    /// Cubic Bezier curve (C): control 1, control 2, end
    CurveTo(Point, Point, Point),
    /// Close the current subpath (Z)
    Close,
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathCommand::MoveTo(p) => write!(f, "M {} {}", p.x, p.y),
            PathCommand::LineTo(p) => write!(f, "L {} {}", p.x, p.y),
            PathCommand::CurveTo(c1, c2, end) => {
                write!(f, "C {} {}, {} {}, {} {}", c1.x, c1.y, c2.x, c2.y, end.x, end.y)
            },
            PathCommand::Close => write!(f, "Z"),
        }
    }
}

/// Join commands into a path-data string.
///
/// # Examples
///
/// ```
/// use page_layers::elements::{format_path_data, PathCommand};
/// use page_layers::geometry::Point;
///
/// let d = format_path_data(&[
///     PathCommand::MoveTo(Point::new(0.0, 0.0)),
///     PathCommand::LineTo(Point::new(10.5, 0.0)),
/// ]);
/// assert_eq!(d, "M 0 0 L 10.5 0");
/// ```
pub fn format_path_data(commands: &[PathCommand]) -> String {
    commands
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_formatting() {
        let cmd = PathCommand::CurveTo(
            Point::new(1.0, 2.0),
            Point::new(3.0, 4.0),
            Point::new(5.0, 6.0),
        );
        assert_eq!(cmd.to_string(), "C 1 2, 3 4, 5 6");
    }

    #[test]
    fn test_closed_polygon() {
        let d = format_path_data(&[
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::LineTo(Point::new(4.0, 0.0)),
            PathCommand::LineTo(Point::new(4.0, 2.0)),
            PathCommand::Close,
        ]);
        assert_eq!(d, "M 0 0 L 4 0 L 4 2 Z");
    }

    #[test]
    fn test_empty_path_data() {
        assert_eq!(format_path_data(&[]), "");
    }
}
