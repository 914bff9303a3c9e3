//! Per-block text layers.
//!
//! Every text block becomes one layer. Spans are concatenated within a line,
//! blank lines are dropped, and the remaining lines are joined with `\n`.
//! The block's style is taken from its first span; these layers are later
//! fused into paragraphs by [`crate::layout::text_merger`].

use crate::elements::{hex_from_packed, Layer, LayerKind, TextLayer};
use crate::extractors::{BuildOutput, PrimitiveKind, PrimitiveOutcome, SkipReason};
use crate::geometry::Point;
use crate::pipeline::config::TextStyleConfig;
use crate::primitives::{TextBlock, TextPage, TextSpan};

/// Builds one text layer per text block.
#[derive(Debug, Clone)]
pub struct TextLayerBuilder<'a> {
    origin: Point,
    style: &'a TextStyleConfig,
}

impl<'a> TextLayerBuilder<'a> {
    /// Create a builder for a page whose canvas origin is `origin`.
    pub fn new(origin: Point, style: &'a TextStyleConfig) -> Self {
        Self { origin, style }
    }

    /// Convert every block of `page`.
    pub fn build(&self, page: &TextPage) -> BuildOutput {
        let mut output = BuildOutput::default();
        for (index, block) in page.blocks.iter().enumerate() {
            output.push(PrimitiveKind::TextBlock, index, self.build_one(block));
        }
        log::debug!(
            "Built {} text block layers ({} empty)",
            output.layers.len(),
            output.skipped.len()
        );
        output
    }

    /// Convert a single block.
    pub fn build_one(&self, block: &TextBlock) -> PrimitiveOutcome {
        let mut first_span: Option<&TextSpan> = None;
        let mut lines = Vec::with_capacity(block.lines.len());

        for line in &block.lines {
            let mut line_text = String::new();
            for span in &line.spans {
                line_text.push_str(&span.text);
                first_span.get_or_insert(span);
            }
            if !line_text.trim().is_empty() {
                lines.push(line_text);
            }
        }

        let text = lines.join("\n");
        let Some(span) = first_span.filter(|_| !text.is_empty()) else {
            return PrimitiveOutcome::Skipped(SkipReason::EmptyText);
        };

        let color = hex_from_packed(span.color);
        let payload = TextLayer::new(text, span.size, span.font.clone(), color)
            .with_line_height(self.style.line_height);

        PrimitiveOutcome::Layer(Layer::new(
            block.bbox.to_rect().relative_to(self.origin),
            LayerKind::Text(payload),
        ))
    }
}
