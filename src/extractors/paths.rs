//! Vector path layers.
//!
//! Drawing operations are rewritten as SVG-style path data relative to the
//! drawing's own bounding box, so a layer can be moved without touching its
//! `d` string:
//! - line segments emit `L`, preceded by `M` when the pen is elsewhere
//! - cubic segments emit `C`, preceded by `M` when the pen is elsewhere
//! - rectangles emit a closed four-point polygon and park the pen at the
//!   rectangle's top-left corner
//!
//! Drawings with neither stroke nor fill are dropped, as are near-white
//! shapes covering most of the page (paper backgrounds). The background test
//! is a heuristic and can drop a legitimate large light shape.

use crate::elements::{
    format_path_data, hex_or_transparent, Layer, LayerKind, PathCommand, PathLayer, TRANSPARENT,
};
use crate::extractors::{BuildOutput, PrimitiveKind, PrimitiveOutcome, SkipReason};
use crate::geometry::{Point, Rect};
use crate::pipeline::config::PathFilterConfig;
use crate::primitives::{DrawOp, DrawingPrimitive};

/// Convert drawing operations to path commands relative to `local_origin`.
pub fn path_commands(items: &[DrawOp], local_origin: Point) -> Vec<PathCommand> {
    let mut commands = Vec::new();
    let mut pen: Option<Point> = None;

    for item in items {
        match *item {
            DrawOp::Line { from, to } => {
                if pen != Some(from) {
                    commands.push(PathCommand::MoveTo(from.relative_to(local_origin)));
                }
                commands.push(PathCommand::LineTo(to.relative_to(local_origin)));
                pen = Some(to);
            },
            DrawOp::Curve {
                from,
                ctrl1,
                ctrl2,
                to,
            } => {
                if pen != Some(from) {
                    commands.push(PathCommand::MoveTo(from.relative_to(local_origin)));
                }
                commands.push(PathCommand::CurveTo(
                    ctrl1.relative_to(local_origin),
                    ctrl2.relative_to(local_origin),
                    to.relative_to(local_origin),
                ));
                pen = Some(to);
            },
            DrawOp::Rect { rect } => {
                let x = rect.x0 - local_origin.x;
                let y = rect.y0 - local_origin.y;
                let (w, h) = (rect.width(), rect.height());
                commands.extend([
                    PathCommand::MoveTo(Point::new(x, y)),
                    PathCommand::LineTo(Point::new(x + w, y)),
                    PathCommand::LineTo(Point::new(x + w, y + h)),
                    PathCommand::LineTo(Point::new(x, y + h)),
                    PathCommand::Close,
                ]);
                pen = Some(Point::new(rect.x0, rect.y0));
            },
        }
    }

    commands
}

/// Builds path layers from vector drawings.
#[derive(Debug, Clone)]
pub struct PathLayerBuilder<'a> {
    origin: Point,
    page_area: Rect,
    config: &'a PathFilterConfig,
}

impl<'a> PathLayerBuilder<'a> {
    /// Create a builder for a page with visible area `page_area` (raw page space).
    pub fn new(page_area: Rect, config: &'a PathFilterConfig) -> Self {
        Self {
            origin: page_area.origin(),
            page_area,
            config,
        }
    }

    /// Convert every drawing.
    pub fn build(&self, drawings: &[DrawingPrimitive]) -> BuildOutput {
        let mut output = BuildOutput::default();
        for (index, drawing) in drawings.iter().enumerate() {
            output.push(PrimitiveKind::Drawing, index, self.build_one(drawing));
        }
        log::debug!(
            "Built {} path layers ({} invisible, {} background)",
            output.layers.len(),
            output.skipped_where(|r| *r == SkipReason::Invisible),
            output.skipped_where(|r| *r == SkipReason::PageBackground)
        );
        output
    }

    /// Convert a single drawing.
    pub fn build_one(&self, drawing: &DrawingPrimitive) -> PrimitiveOutcome {
        let rect = drawing.rect.to_rect();
        let stroke = hex_or_transparent(drawing.stroke);
        let fill = hex_or_transparent(drawing.fill);

        if stroke == TRANSPARENT && fill == TRANSPARENT {
            return PrimitiveOutcome::Skipped(SkipReason::Invisible);
        }
        if self.is_page_background(&rect, &fill) {
            log::debug!("Skipping background fill {} at {:?}", fill, drawing.rect);
            return PrimitiveOutcome::Skipped(SkipReason::PageBackground);
        }

        let d = format_path_data(&path_commands(&drawing.items, rect.origin()));
        let layer = Layer::new(
            rect.relative_to(self.origin),
            LayerKind::Path(PathLayer {
                d,
                fill,
                stroke,
                stroke_width: drawing
                    .stroke_width
                    .unwrap_or(self.config.default_stroke_width),
            }),
        );
        PrimitiveOutcome::Layer(layer)
    }

    fn is_page_background(&self, rect: &Rect, fill: &str) -> bool {
        let coverage = self.config.background_coverage;
        self.config.is_background_fill(fill)
            && rect.width >= self.page_area.width * coverage
            && rect.height >= self.page_area.height * coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Color;
    use crate::primitives::BBox;

    fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> DrawOp {
        DrawOp::Line {
            from: Point::new(x0, y0),
            to: Point::new(x1, y1),
        }
    }

    fn drawing(
        rect: BBox,
        items: Vec<DrawOp>,
        stroke: Option<Color>,
        fill: Option<Color>,
    ) -> DrawingPrimitive {
        DrawingPrimitive {
            rect,
            items,
            stroke,
            fill,
            stroke_width: None,
        }
    }

    #[test]
    fn test_connected_lines_share_move() {
        let d = format_path_data(&path_commands(
            &[line(10.0, 10.0, 20.0, 10.0), line(20.0, 10.0, 20.0, 30.0)],
            Point::new(10.0, 10.0),
        ));
        assert_eq!(d, "M 0 0 L 10 0 L 10 20");
    }

    #[test]
    fn test_disjoint_lines_insert_move() {
        let d = format_path_data(&path_commands(
            &[line(0.0, 0.0, 5.0, 0.0), line(0.0, 5.0, 5.0, 5.0)],
            Point::default(),
        ));
        assert_eq!(d, "M 0 0 L 5 0 M 0 5 L 5 5");
    }

    #[test]
    fn test_curve_after_line() {
        let items = [
            line(0.0, 0.0, 10.0, 0.0),
            DrawOp::Curve {
                from: Point::new(10.0, 0.0),
                ctrl1: Point::new(15.0, 0.0),
                ctrl2: Point::new(20.0, 5.0),
                to: Point::new(20.0, 10.0),
            },
        ];
        let d = format_path_data(&path_commands(&items, Point::default()));
        assert_eq!(d, "M 0 0 L 10 0 C 15 0, 20 5, 20 10");
    }

    #[test]
    fn test_rect_parks_pen_at_corner() {
        let items = [
            DrawOp::Rect {
                rect: BBox::new(10.0, 20.0, 30.0, 40.0),
            },
            line(10.0, 20.0, 0.0, 0.0),
        ];
        let d = format_path_data(&path_commands(&items, Point::new(10.0, 20.0)));
        assert_eq!(d, "M 0 0 L 20 0 L 20 20 L 0 20 Z L -10 -20");
    }

    #[test]
    fn test_invisible_drawing_skipped() {
        let config = PathFilterConfig::default();
        let builder = PathLayerBuilder::new(Rect::new(0.0, 0.0, 100.0, 100.0), &config);
        let empty = drawing(BBox::new(0.0, 0.0, 10.0, 10.0), vec![], None, None);
        let outcome = builder.build_one(&empty);
        assert_eq!(outcome, PrimitiveOutcome::Skipped(SkipReason::Invisible));
    }

    #[test]
    fn test_background_fill_filter() {
        let config = PathFilterConfig::default();
        let builder = PathLayerBuilder::new(Rect::new(0.0, 0.0, 1000.0, 1000.0), &config);
        let rect_op = |b: BBox| vec![DrawOp::Rect { rect: b }];

        let large = BBox::new(0.0, 0.0, 950.0, 950.0);
        let outcome =
            builder.build_one(&drawing(large, rect_op(large), None, Some(Color::white())));
        assert_eq!(outcome, PrimitiveOutcome::Skipped(SkipReason::PageBackground));

        let half = BBox::new(0.0, 0.0, 500.0, 1000.0);
        let outcome = builder.build_one(&drawing(half, rect_op(half), None, Some(Color::white())));
        assert!(matches!(outcome, PrimitiveOutcome::Layer(_)));

        let gray_fill = Some(Color::new(0.5, 0.5, 0.5));
        let gray = builder.build_one(&drawing(large, rect_op(large), None, gray_fill));
        assert!(matches!(gray, PrimitiveOutcome::Layer(_)));
    }

    #[test]
    fn test_layer_fields() {
        let config = PathFilterConfig::default();
        let builder = PathLayerBuilder::new(Rect::new(5.0, 5.0, 200.0, 200.0), &config);
        let outcome = builder.build_one(&drawing(
            BBox::new(15.0, 25.0, 35.0, 25.0),
            vec![line(15.0, 25.0, 35.0, 25.0)],
            Some(Color::new(1.0, 0.0, 0.0)),
            None,
        ));
        let PrimitiveOutcome::Layer(layer) = outcome else {
            panic!("expected a layer");
        };
        assert_eq!((layer.bbox.x, layer.bbox.y), (10.0, 20.0));
        assert_eq!(layer.bbox.height, 0.0);
        let path = layer.as_path().unwrap();
        assert_eq!(path.stroke, "#ff0000");
        assert_eq!(path.fill, TRANSPARENT);
        assert_eq!(path.stroke_width, 1.0);
        assert_eq!(path.d, "M 0 0 L 20 0");
    }
}
