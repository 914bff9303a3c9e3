//! Containment hierarchy between layers.
//!
//! Each layer's parent is the smallest-area layer that strictly outranks it
//! in area and contains it within a tolerance. Ties on area keep the
//! earliest candidate in list order. Because a parent's area is always
//! strictly larger than its child's, the result is a forest.
//!
//! The search is quadratic in the number of layers.

use crate::elements::Layer;
use crate::geometry::Rect;

/// Compute the parent index of every rectangle.
///
/// # Examples
///
/// ```
/// use page_layers::geometry::Rect;
/// use page_layers::layout::parent_indices;
///
/// let rects = [
///     Rect::new(0.0, 0.0, 100.0, 100.0),
///     Rect::new(10.0, 10.0, 50.0, 50.0),
///     Rect::new(20.0, 20.0, 10.0, 10.0),
/// ];
/// assert_eq!(parent_indices(&rects, 2.0), vec![None, Some(0), Some(1)]);
/// ```
pub fn parent_indices(rects: &[Rect], tolerance: f32) -> Vec<Option<usize>> {
    let areas: Vec<f32> = rects.iter().map(Rect::area).collect();

    rects
        .iter()
        .enumerate()
        .map(|(i, child)| {
            let mut best: Option<usize> = None;
            for (j, candidate) in rects.iter().enumerate() {
                if j == i || !(areas[j] > areas[i]) {
                    continue;
                }
                if !candidate.contains_within(child, tolerance) {
                    continue;
                }
                if best.map_or(true, |b| areas[j] < areas[b]) {
                    best = Some(j);
                }
            }
            best
        })
        .collect()
}

/// Set `parent_id` on every layer from the containment forest.
///
/// Ids must already be assigned. Existing parent links are overwritten.
pub fn build_hierarchy(layers: &mut [Layer], tolerance: f32) {
    let rects: Vec<Rect> = layers.iter().map(|l| l.bbox).collect();
    let parents = parent_indices(&rects, tolerance);

    let ids: Vec<String> = layers.iter().map(|l| l.id.clone()).collect();
    let mut nested = 0usize;
    for (layer, parent) in layers.iter_mut().zip(parents) {
        layer.parent_id = parent.map(|p| ids[p].clone());
        if layer.parent_id.is_some() {
            nested += 1;
        }
    }
    log::debug!("Containment hierarchy: {} of {} layers nested", nested, layers.len());
}
