//! Page layer reconstruction pipeline.
//!
//! ```text
//! PageSnapshot
//!     ↓
//! [Canvas::normalize] (canvas size + origin)
//!     ↓
//! [ImageLayerBuilder] [PathLayerBuilder] [TextLayerBuilder]
//!     ↓
//! [TextMerger] (lines → columns → paragraphs, images as obstructions)
//!     ↓
//! images ++ paths ++ text, ids assigned in that order
//!     ↓
//! [build_hierarchy] (containment forest)
//!     ↓
//! PageLayers
//! ```
//!
//! The pipeline holds no state between calls. Every invocation works on its
//! own copy of the page's primitives, so pages can be processed in parallel
//! by the caller.

pub mod config;

pub use config::{
    HierarchyConfig, LayerPipelineConfig, PathFilterConfig, TextMergeConfig, TextStyleConfig,
};

use crate::elements::{assign_ids, PageLayers};
use crate::error::Result;
use crate::extractors::{
    ImageLayerBuilder, PathLayerBuilder, PrimitiveKind, SkipReason, SkippedPrimitive,
    TextLayerBuilder,
};
use crate::geometry::Canvas;
use crate::layout::{build_hierarchy, TextMerger};
use crate::primitives::{DocumentSnapshot, PageSnapshot};

/// What happened to the primitives of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    /// Primitives that produced no layer, grouped by builder
    pub skipped: Vec<SkippedPrimitive>,
    /// Images kept without their soft mask because compositing failed
    pub mask_fallbacks: usize,
    /// Text block layers before merging
    pub text_blocks: usize,
    /// Text layers after merging
    pub merged_text: usize,
}

impl ExtractionReport {
    /// Number of skipped primitives of `kind`.
    pub fn skipped_of(&self, kind: PrimitiveKind) -> usize {
        self.skipped.iter().filter(|s| s.kind == kind).count()
    }

    /// Number of skipped primitives whose reason matches `predicate`.
    pub fn skipped_where(&self, predicate: impl Fn(&SkipReason) -> bool) -> usize {
        self.skipped.iter().filter(|s| predicate(&s.reason)).count()
    }
}

/// Layers of one page plus the extraction report.
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtraction {
    /// Reconstructed layers
    pub layers: PageLayers,
    /// Skip and merge statistics
    pub report: ExtractionReport,
}

/// The layer reconstruction pipeline.
///
/// # Examples
///
/// ```
/// use page_layers::geometry::Rotation;
/// use page_layers::primitives::{BBox, PageSnapshot};
/// use page_layers::LayerPipeline;
///
/// let page = PageSnapshot::new(BBox::new(0.0, 0.0, 612.0, 792.0), Rotation::Quarter);
/// let layers = LayerPipeline::new().extract(&page);
/// assert_eq!((layers.width, layers.height), (792.0, 612.0));
/// assert!(layers.layers.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LayerPipeline {
    config: LayerPipelineConfig,
}

impl LayerPipeline {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: LayerPipelineConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &LayerPipelineConfig {
        &self.config
    }

    /// Reconstruct the layers of one page, with the extraction report.
    pub fn process(&self, page: &PageSnapshot) -> PageExtraction {
        let area = page.geometry.visible_area.to_rect();
        let (canvas, origin) = Canvas::normalize(area, page.geometry.rotation);
        log::debug!(
            "Canvas {}x{} (rotation {}), origin ({}, {})",
            canvas.width,
            canvas.height,
            page.geometry.rotation.degrees(),
            origin.x,
            origin.y
        );

        let images = ImageLayerBuilder::new(origin).build(&page.images, page);
        let paths = PathLayerBuilder::new(area, &self.config.paths).build(&page.drawings);
        let text = TextLayerBuilder::new(origin, &self.config.text).build(&page.text);

        let text_blocks = text.layers.len();
        let merged = TextMerger::new(&self.config.merge).merge(text.layers, &images.layers);
        let merged_text = merged.len();

        let mut report = ExtractionReport {
            skipped: Vec::new(),
            mask_fallbacks: images.degraded,
            text_blocks,
            merged_text,
        };
        report.skipped.extend(images.skipped);
        report.skipped.extend(paths.skipped);
        report.skipped.extend(text.skipped);

        let mut layers = images.layers;
        layers.extend(paths.layers);
        layers.extend(merged);
        assign_ids(&mut layers);
        build_hierarchy(&mut layers, self.config.hierarchy.containment_tolerance);

        log::debug!(
            "Extracted {} layers ({} primitives skipped)",
            layers.len(),
            report.skipped.len()
        );

        PageExtraction {
            layers: PageLayers::new(canvas, layers),
            report,
        }
    }

    /// Reconstruct the layers of one page.
    pub fn extract(&self, page: &PageSnapshot) -> PageLayers {
        self.process(page).layers
    }

    /// Reconstruct page `index` of `document`, with the extraction report.
    pub fn process_page(
        &self,
        document: &DocumentSnapshot,
        index: usize,
    ) -> Result<PageExtraction> {
        let page = document.page(index)?;
        Ok(self.process(page))
    }

    /// Reconstruct page `index` of `document`.
    ///
    /// Fails with [`crate::Error::PageNotFound`] when `index` is out of range.
    pub fn extract_page(&self, document: &DocumentSnapshot, index: usize) -> Result<PageLayers> {
        Ok(self.process_page(document, index)?.layers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Color;
    use crate::error::Error;
    use crate::geometry::Rotation;
    use crate::primitives::{
        BBox, DrawOp, DrawingPrimitive, RasterPrimitive, TextBlock, TextLine, TextSpan,
    };

    fn block(x0: f32, y0: f32, x1: f32, y1: f32, text: &str) -> TextBlock {
        let bbox = BBox::new(x0, y0, x1, y1);
        TextBlock {
            bbox,
            lines: vec![TextLine {
                bbox,
                spans: vec![TextSpan {
                    text: text.to_string(),
                    size: 12.0,
                    font: "Helvetica".to_string(),
                    color: 0,
                    bbox,
                }],
            }],
        }
    }

    #[test]
    fn test_layer_order_and_ids() {
        let mut page = PageSnapshot::new(BBox::new(0.0, 0.0, 600.0, 800.0), Rotation::None);
        page.text.blocks.push(block(100.0, 100.0, 200.0, 112.0, "hello"));
        let rect = BBox::new(50.0, 50.0, 300.0, 300.0);
        page.drawings.push(DrawingPrimitive {
            rect,
            items: vec![DrawOp::Rect { rect }],
            stroke: Some(Color::black()),
            fill: None,
            stroke_width: Some(2.0),
        });

        let layers = LayerPipeline::new().extract(&page);
        let types: Vec<&str> = layers.layers.iter().map(|l| l.layer_type()).collect();
        assert_eq!(types, vec!["path", "text"]);
        assert_eq!(layers.layers[0].id, "layer-0");
        assert_eq!(layers.layers[1].id, "layer-1");
        assert_eq!(layers.layers[1].parent_id.as_deref(), Some("layer-0"));
    }

    #[test]
    fn test_report_collects_skips() {
        let mut page = PageSnapshot::new(BBox::new(0.0, 0.0, 100.0, 100.0), Rotation::None);
        page.images.push(RasterPrimitive {
            xref: 99,
            bbox: BBox::new(0.0, 0.0, 10.0, 10.0),
        });
        page.drawings.push(DrawingPrimitive {
            rect: BBox::new(0.0, 0.0, 10.0, 10.0),
            items: vec![],
            stroke: None,
            fill: None,
            stroke_width: None,
        });
        page.text.blocks.push(block(0.0, 0.0, 10.0, 10.0, "   "));

        let extraction = LayerPipeline::new().process(&page);
        assert!(extraction.layers.layers.is_empty());
        assert_eq!(extraction.report.skipped.len(), 3);
        assert_eq!(extraction.report.skipped_of(PrimitiveKind::Image), 1);
        assert_eq!(extraction.report.skipped_where(|r| *r == SkipReason::Invisible), 1);
        assert_eq!(extraction.report.skipped_where(|r| *r == SkipReason::EmptyText), 1);
        assert_eq!(extraction.report.mask_fallbacks, 0);
    }

    #[test]
    fn test_origin_offset_applied() {
        let mut page = PageSnapshot::new(BBox::new(20.0, 30.0, 620.0, 830.0), Rotation::None);
        page.text.blocks.push(block(120.0, 130.0, 220.0, 142.0, "offset"));
        let layers = LayerPipeline::new().extract(&page);
        let layer = &layers.layers[0];
        assert_eq!((layer.bbox.x, layer.bbox.y), (100.0, 100.0));
    }

    #[test]
    fn test_extract_page_out_of_range() {
        let document = DocumentSnapshot::default();
        let err = LayerPipeline::new().extract_page(&document, 3).unwrap_err();
        assert!(matches!(err, Error::PageNotFound { index: 3, page_count: 0 }));
    }
}
