//! Primitive-to-layer builders.
//!
//! Each builder turns one category of page primitive into layers:
//! - [`images`]: raster placements, with soft-mask compositing
//! - [`paths`]: vector drawings, with the background-fill heuristic
//! - [`text`]: text blocks, one layer per block
//!
//! A single bad primitive never aborts a page. Builders map every primitive
//! to a [`PrimitiveOutcome`] and aggregate the results into a [`BuildOutput`],
//! so skipped primitives stay observable.

pub mod images;
pub mod paths;
pub mod text;

pub use images::{ImageLayerBuilder, Pixmap};
pub use paths::{path_commands, PathLayerBuilder};
pub use text::TextLayerBuilder;

use std::fmt;

use crate::elements::Layer;

/// Which primitive category a record refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Raster image placement
    Image,
    /// Vector drawing
    Drawing,
    /// Text block
    TextBlock,
}

/// Why a primitive produced no layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The primitive could not be materialized
    Unreadable(String),
    /// Neither stroke nor fill is visible
    Invisible,
    /// Classified as a full-page paper background
    PageBackground,
    /// Text block without visible text
    EmptyText,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(reason) => write!(f, "unreadable: {}", reason),
            SkipReason::Invisible => write!(f, "invisible"),
            SkipReason::PageBackground => write!(f, "page background"),
            SkipReason::EmptyText => write!(f, "empty text"),
        }
    }
}

/// Result of converting a single primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveOutcome {
    /// The primitive became a layer
    Layer(Layer),
    /// The primitive was dropped
    Skipped(SkipReason),
}

/// A dropped primitive and where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPrimitive {
    /// Primitive category
    pub kind: PrimitiveKind,
    /// Index within its category's input list
    pub index: usize,
    /// Why it was dropped
    pub reason: SkipReason,
}

/// Layers produced by one builder, plus the primitives it dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOutput {
    /// Produced layers, in input order
    pub layers: Vec<Layer>,
    /// Dropped primitives, in input order
    pub skipped: Vec<SkippedPrimitive>,
    /// Primitives kept in a reduced form (e.g. an image whose mask was dropped)
    pub degraded: usize,
}

impl BuildOutput {
    /// Record the outcome for primitive `index`.
    pub fn push(&mut self, kind: PrimitiveKind, index: usize, outcome: PrimitiveOutcome) {
        match outcome {
            PrimitiveOutcome::Layer(layer) => self.layers.push(layer),
            PrimitiveOutcome::Skipped(reason) => {
                self.skipped.push(SkippedPrimitive {
                    kind,
                    index,
                    reason,
                });
            },
        }
    }

    /// Count skips matching `predicate`.
    pub fn skipped_where(&self, predicate: impl Fn(&SkipReason) -> bool) -> usize {
        self.skipped.iter().filter(|s| predicate(&s.reason)).count()
    }
}
