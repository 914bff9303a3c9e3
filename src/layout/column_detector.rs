//! Gutter-based column detection.
//!
//! Columns are found from the distribution of left edges alone: whenever two
//! consecutive left edges (sorted) are further apart than a fraction of the
//! text extent, a column boundary is placed halfway between them. This keeps
//! paragraph merging from fusing unrelated text across a gutter.

use crate::geometry::Rect;

/// Slack added past the rightmost text edge so every left edge falls inside
/// the last column.
const END_MARGIN: f32 = 100.0;

/// Column intervals covering the text extent of a page.
///
/// Column `i` is the half-open interval `[boundaries[i], boundaries[i + 1])`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    boundaries: Vec<f32>,
}

impl ColumnLayout {
    /// Detect columns from `left_edges` within `[page_left, page_right]`.
    ///
    /// A boundary is recorded at the midpoint of every gap between sorted
    /// left edges that exceeds `gap_ratio` of the extent width. There is
    /// always at least one column.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::layout::ColumnLayout;
    ///
    /// let layout = ColumnLayout::detect(&[0.0, 10.0, 400.0, 410.0], 0.0, 500.0, 0.15);
    /// assert_eq!(layout.column_count(), 2);
    /// assert_eq!(layout.split_points(), &[205.0]);
    /// ```
    pub fn detect(left_edges: &[f32], page_left: f32, page_right: f32, gap_ratio: f32) -> Self {
        let min_gap = (page_right - page_left) * gap_ratio;
        let mut sorted = left_edges.to_vec();
        sorted.sort_by(f32::total_cmp);

        let mut boundaries = vec![page_left];
        boundaries.extend(
            sorted
                .windows(2)
                .filter(|pair| pair[1] - pair[0] > min_gap)
                .map(|pair| (pair[0] + pair[1]) / 2.0),
        );
        boundaries.push(page_right + END_MARGIN);

        Self { boundaries }
    }

    /// Detect columns from a set of text boxes.
    ///
    /// The extent runs from the smallest left edge to the largest right edge.
    /// Returns `None` when `rects` is empty.
    pub fn from_rects(rects: &[Rect], gap_ratio: f32) -> Option<Self> {
        let page_left = rects.iter().map(Rect::left).min_by(f32::total_cmp)?;
        let page_right = rects.iter().map(Rect::right).max_by(f32::total_cmp)?;
        let lefts: Vec<f32> = rects.iter().map(Rect::left).collect();
        Some(Self::detect(&lefts, page_left, page_right, gap_ratio))
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.boundaries.len() - 1
    }

    /// All boundaries, including the outer two.
    pub fn boundaries(&self) -> &[f32] {
        &self.boundaries
    }

    /// Interior boundaries (gutter midpoints).
    pub fn split_points(&self) -> &[f32] {
        &self.boundaries[1..self.boundaries.len() - 1]
    }

    /// Index of the column whose interval contains `x`.
    pub fn column_of(&self, x: f32) -> Option<usize> {
        self.boundaries
            .windows(2)
            .position(|bounds| bounds[0] <= x && x < bounds[1])
    }
}
