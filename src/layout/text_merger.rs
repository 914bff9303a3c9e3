//! Fusion of per-block text layers into lines and paragraphs.
//!
//! The merge runs in three phases over geometry alone:
//!
//! 1. **Lines.** Blocks sorted by `(round(y), x)` are joined left to right
//!    when they sit on the same visual line and the horizontal gap looks like
//!    a word space. Both thresholds scale with the font size of the run.
//! 2. **Columns.** Left edges are clustered into columns with
//!    [`ColumnLayout`], so paragraphs never span a gutter.
//! 3. **Paragraphs.** Within each column, lines sorted by `y` are stacked
//!    while the vertical gap looks like line spacing and no image sits in the
//!    gap between them.
//!
//! Every resulting layer is widened by the configured padding so renderers
//! do not wrap the reconstructed text early.

use crate::elements::{Layer, LayerKind, TextLayer};
use crate::geometry::{spans_overlap, Rect};
use crate::layout::column_detector::ColumnLayout;
use crate::pipeline::config::TextMergeConfig;

/// A text layer being grown by the merge.
#[derive(Debug, Clone)]
struct Fragment {
    bbox: Rect,
    text: TextLayer,
}

impl Fragment {
    fn font_size(&self) -> f32 {
        self.text.font_size
    }

    /// Append a word on the same line.
    fn push_word(&mut self, next: Fragment) {
        if !self.text.text.ends_with(' ') {
            self.text.text.push(' ');
        }
        self.text.text.push_str(&next.text.text);
        self.bbox.width = next.bbox.right() - self.bbox.x;
        self.bbox.height = self.bbox.height.max(next.bbox.height);
    }

    /// Append a line below.
    fn push_line(&mut self, next: Fragment) {
        self.text.text.push('\n');
        self.text.text.push_str(&next.text.text);
        self.bbox.height = next.bbox.bottom() - self.bbox.y;
        self.bbox.width = self.bbox.width.max(next.bbox.width);
    }

    fn into_layer(self) -> Layer {
        Layer::new(self.bbox, LayerKind::Text(self.text))
    }
}

/// Merges raw text block layers into paragraph layers.
#[derive(Debug, Clone, Copy)]
pub struct TextMerger<'a> {
    config: &'a TextMergeConfig,
}

impl<'a> TextMerger<'a> {
    /// Create a merger with the given thresholds.
    pub fn new(config: &'a TextMergeConfig) -> Self {
        Self { config }
    }

    /// Run all three phases.
    ///
    /// `images` are the page's image layers; any non-image entries are
    /// ignored. Non-text entries in `layers` are returned untouched after
    /// the merged text.
    pub fn merge(&self, layers: Vec<Layer>, images: &[Layer]) -> Vec<Layer> {
        let mut passthrough = Vec::new();
        let mut fragments = Vec::with_capacity(layers.len());
        for layer in layers {
            match layer.kind {
                LayerKind::Text(text) => fragments.push(Fragment {
                    bbox: layer.bbox,
                    text,
                }),
                _ => passthrough.push(layer),
            }
        }
        if fragments.is_empty() {
            return passthrough;
        }

        let input_count = fragments.len();
        let lines = self.merge_lines(fragments);
        let line_count = lines.len();

        let obstacles: Vec<Rect> = images
            .iter()
            .filter(|l| l.is_image())
            .map(|l| l.bbox)
            .collect();

        let mut merged = Vec::with_capacity(lines.len());
        for column in self.split_columns(lines) {
            merged.extend(self.merge_paragraphs(column, &obstacles));
        }

        log::debug!(
            "Merged {} text blocks into {} lines and {} paragraphs",
            input_count,
            line_count,
            merged.len()
        );

        merged
            .into_iter()
            .map(|mut fragment| {
                fragment.bbox.width *= self.config.width_padding;
                fragment.into_layer()
            })
            .chain(passthrough)
            .collect()
    }

    /// Phase 1: join words on the same visual line.
    fn merge_lines(&self, mut fragments: Vec<Fragment>) -> Vec<Fragment> {
        fragments.sort_by(|a, b| {
            let row = a.bbox.y.round_ties_even().total_cmp(&b.bbox.y.round_ties_even());
            row.then_with(|| a.bbox.x.total_cmp(&b.bbox.x))
        });

        let mut merged = Vec::with_capacity(fragments.len());
        let mut iter = fragments.into_iter();
        let Some(mut current) = iter.next() else {
            return merged;
        };

        for next in iter {
            let size = current.font_size();
            let same_line =
                (next.bbox.y - current.bbox.y).abs() < size * self.config.line_tolerance_ratio;
            let gap = next.bbox.x - current.bbox.right();
            let adjacent = gap >= -self.config.word_overlap_tolerance
                && gap <= size * self.config.word_gap_ratio;

            if same_line && adjacent {
                current.push_word(next);
            } else {
                merged.push(std::mem::replace(&mut current, next));
            }
        }
        merged.push(current);
        merged
    }

    /// Phase 2: group lines by column, preserving their order within each.
    fn split_columns(&self, lines: Vec<Fragment>) -> Vec<Vec<Fragment>> {
        let rects: Vec<Rect> = lines.iter().map(|f| f.bbox).collect();
        let Some(layout) = ColumnLayout::from_rects(&rects, self.config.column_gap_ratio) else {
            return Vec::new();
        };
        if layout.column_count() > 1 {
            log::debug!(
                "Detected {} text columns, splits at {:?}",
                layout.column_count(),
                layout.split_points()
            );
        }

        let mut columns: Vec<Vec<Fragment>> = vec![Vec::new(); layout.column_count()];
        for line in lines {
            match layout.column_of(line.bbox.x) {
                Some(index) => columns[index].push(line),
                None => log::warn!("Text at x={} fell outside every column", line.bbox.x),
            }
        }
        columns
    }

    /// Phase 3: stack lines of one column into paragraphs.
    fn merge_paragraphs(&self, mut column: Vec<Fragment>, obstacles: &[Rect]) -> Vec<Fragment> {
        column.sort_by(|a, b| a.bbox.y.total_cmp(&b.bbox.y));

        let mut merged = Vec::with_capacity(column.len());
        let mut iter = column.into_iter();
        let Some(mut current) = iter.next() else {
            return merged;
        };

        for next in iter {
            let gap = next.bbox.y - current.bbox.bottom();
            let continues = gap >= -self.config.paragraph_overlap_tolerance
                && gap <= current.font_size() * self.config.paragraph_gap_ratio;

            if continues && !is_obstructed(&current.bbox, &next.bbox, obstacles) {
                current.push_line(next);
            } else {
                merged.push(std::mem::replace(&mut current, next));
            }
        }
        merged.push(current);
        merged
    }
}

/// Check whether an obstacle sits in the vertical gap between `upper` and
/// `lower` and across their combined horizontal span.
///
/// Overlapping or touching boxes have no gap and are never obstructed.
pub fn is_obstructed(upper: &Rect, lower: &Rect, obstacles: &[Rect]) -> bool {
    let gap_top = upper.bottom();
    let gap_bottom = lower.top();
    if gap_bottom <= gap_top {
        return false;
    }

    let span_left = upper.left().min(lower.left());
    let span_right = upper.right().max(lower.right());
    obstacles.iter().any(|img| {
        spans_overlap(img.top(), img.bottom(), gap_top, gap_bottom)
            && spans_overlap(img.left(), img.right(), span_left, span_right)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ImageLayer;

    fn text(x: f32, y: f32, w: f32, h: f32, content: &str) -> Layer {
        Layer::new(
            Rect::new(x, y, w, h),
            LayerKind::Text(TextLayer::new(content, 10.0, "Helvetica", "#000000")),
        )
    }

    fn image(x: f32, y: f32, w: f32, h: f32) -> Layer {
        Layer::new(
            Rect::new(x, y, w, h),
            LayerKind::Image(ImageLayer {
                src: String::new(),
                rotation: 0.0,
            }),
        )
    }

    fn unpadded() -> TextMergeConfig {
        TextMergeConfig {
            width_padding: 1.0,
            ..TextMergeConfig::default()
        }
    }

    fn texts(layers: &[Layer]) -> Vec<&str> {
        layers
            .iter()
            .filter_map(|l| l.as_text())
            .map(|t| t.text.as_str())
            .collect()
    }

    #[test]
    fn test_words_on_a_line_merge() {
        let config = unpadded();
        let out = TextMerger::new(&config).merge(
            vec![text(45.0, 100.3, 30.0, 12.0, "world"), text(0.0, 100.0, 40.0, 10.0, "Hello")],
            &[],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(texts(&out), vec!["Hello world"]);
        assert_eq!(out[0].bbox.width, 75.0);
        assert_eq!(out[0].bbox.height, 12.0);
    }

    #[test]
    fn test_trailing_space_not_doubled() {
        let config = unpadded();
        let out = TextMerger::new(&config).merge(
            vec![text(0.0, 0.0, 40.0, 10.0, "Hello "), text(42.0, 0.0, 30.0, 10.0, "there")],
            &[],
        );
        assert_eq!(texts(&out), vec!["Hello there"]);
    }

    #[test]
    fn test_wide_gap_keeps_words_apart() {
        let config = unpadded();
        // gap of 11 exceeds 1.0 x font size 10
        let out = TextMerger::new(&config).merge(
            vec![text(0.0, 0.0, 40.0, 10.0, "a"), text(51.0, 0.0, 40.0, 10.0, "b")],
            &[],
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_overlap_tolerance() {
        let config = unpadded();
        let merger = TextMerger::new(&config);
        let pair = |x| vec![text(0.0, 0.0, 40.0, 10.0, "a"), text(x, 0.0, 10.0, 10.0, "b")];

        assert_eq!(texts(&merger.merge(pair(37.0), &[])), vec!["a b"]);
        assert_eq!(merger.merge(pair(36.5), &[]).len(), 2);
    }

    #[test]
    fn test_word_gap_limit_is_inclusive() {
        let config = unpadded();
        let merger = TextMerger::new(&config);
        let pair = |x| vec![text(0.0, 0.0, 40.0, 10.0, "a"), text(x, 0.0, 40.0, 10.0, "b")];

        // gap of exactly 1.0 x font size 10
        let out = merger.merge(pair(50.0), &[]);
        assert_eq!(texts(&out), vec!["a b"]);
        assert_eq!(out[0].bbox.width, 90.0);

        assert_eq!(merger.merge(pair(50.5), &[]).len(), 2);
    }

    #[test]
    fn test_paragraph_gap_limit_is_inclusive() {
        let config = unpadded();
        let merger = TextMerger::new(&config);
        let lines = |y| vec![text(0.0, 0.0, 100.0, 10.0, "one"), text(0.0, y, 100.0, 10.0, "two")];

        // gap of exactly 1.3 x font size 10
        let out = merger.merge(lines(23.0), &[]);
        assert_eq!(texts(&out), vec!["one\ntwo"]);
        assert_eq!(out[0].bbox.height, 33.0);

        assert_eq!(merger.merge(lines(23.5), &[]).len(), 2);
    }

    #[test]
    fn test_paragraph_overlap_limit_is_inclusive() {
        let config = unpadded();
        let merger = TextMerger::new(&config);
        let lines = |y| vec![text(0.0, 0.0, 100.0, 10.0, "one"), text(0.0, y, 100.0, 10.0, "two")];

        // lines overlapping by exactly 2 still stack
        let out = merger.merge(lines(8.0), &[]);
        assert_eq!(texts(&out), vec!["one\ntwo"]);
        assert_eq!(out[0].bbox.height, 18.0);

        assert_eq!(texts(&merger.merge(lines(7.5), &[])), vec!["one", "two"]);
    }

    #[test]
    fn test_lines_stack_into_paragraph() {
        let config = unpadded();
        let out = TextMerger::new(&config).merge(
            vec![text(0.0, 0.0, 100.0, 10.0, "line one"), text(0.0, 14.0, 80.0, 10.0, "line two")],
            &[],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(texts(&out), vec!["line one\nline two"]);
        assert_eq!(out[0].bbox.height, 24.0);
        assert_eq!(out[0].bbox.width, 100.0);
    }

    #[test]
    fn test_large_vertical_gap_splits_paragraphs() {
        let config = unpadded();
        // gap 14 > 1.3 x 10
        let out = TextMerger::new(&config).merge(
            vec![text(0.0, 0.0, 100.0, 10.0, "one"), text(0.0, 24.0, 100.0, 10.0, "two")],
            &[],
        );
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_image_in_gap_blocks_merge() {
        let config = unpadded();
        let merger = TextMerger::new(&config);
        let lines = || {
            vec![text(0.0, 0.0, 100.0, 10.0, "above"), text(0.0, 20.0, 100.0, 10.0, "below")]
        };

        let blocked = merger.merge(lines(), &[image(0.0, 11.0, 100.0, 8.0)]);
        assert_eq!(blocked.len(), 2);

        let merged = merger.merge(lines(), &[]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_image_beside_gap_does_not_block() {
        let config = unpadded();
        let out = TextMerger::new(&config).merge(
            vec![text(0.0, 0.0, 100.0, 10.0, "above"), text(0.0, 20.0, 100.0, 10.0, "below")],
            &[image(300.0, 0.0, 50.0, 50.0)],
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_columns_are_not_fused() {
        let config = unpadded();
        let out = TextMerger::new(&config).merge(
            vec![
                text(0.0, 0.0, 90.0, 10.0, "left 1"),
                text(400.0, 0.0, 90.0, 10.0, "right 1"),
                text(0.0, 12.0, 90.0, 10.0, "left 2"),
                text(400.0, 12.0, 90.0, 10.0, "right 2"),
            ],
            &[],
        );
        assert_eq!(texts(&out), vec!["left 1\nleft 2", "right 1\nright 2"]);
    }

    #[test]
    fn test_width_padding_applied() {
        let config = TextMergeConfig::default();
        let out = TextMerger::new(&config).merge(vec![text(0.0, 0.0, 100.0, 10.0, "x")], &[]);
        assert!((out[0].bbox.width - 108.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_text_layers_pass_through() {
        let config = unpadded();
        let out = TextMerger::new(&config).merge(vec![image(0.0, 0.0, 5.0, 5.0)], &[]);
        assert_eq!(out.len(), 1);
        assert!(out[0].is_image());
    }

    #[test]
    fn test_obstruction_requires_positive_gap() {
        let upper = Rect::new(0.0, 0.0, 10.0, 10.0);
        let overlapping = Rect::new(0.0, 9.0, 10.0, 10.0);
        let blocker = Rect::new(0.0, 0.0, 10.0, 30.0);
        assert!(!is_obstructed(&upper, &overlapping, &[blocker]));

        let lower = Rect::new(0.0, 15.0, 10.0, 10.0);
        assert!(is_obstructed(&upper, &lower, &[blocker]));
    }
}
