// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::unnecessary_map_or)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # Page Layers
//!
//! Reconstructs editable, hierarchically nested layers from the raw
//! rendering primitives of a document page.
//!
//! ## Core Features
//!
//! - **Geometry Normalization**: canvas size and origin from the visible area and rotation
//! - **Images**: soft-mask compositing, CMYK conversion, PNG data URIs
//! - **Paths**: SVG-style path data with a paper-background filter
//! - **Text**: block layers fused into lines and paragraphs across columns,
//!   kept apart by intervening images
//! - **Hierarchy**: containment forest over every layer
//!
//! ## Architecture
//!
//! - [`primitives`]: the input snapshot (one page's primitives, or a whole document)
//! - [`extractors`]: one builder per primitive category, each reporting what it skipped
//! - [`layout`]: column detection, text merging, containment hierarchy
//! - [`pipeline`]: orchestration and configuration
//! - [`elements`]: the output model, serialized with `serde`
//!
//! ## Quick Start
//!
//! ```no_run
//! use page_layers::primitives::DocumentSnapshot;
//! use page_layers::LayerPipeline;
//!
//! # fn main() -> page_layers::Result<()> {
//! let document = DocumentSnapshot::from_json_file("snapshot.json")?;
//! let layers = LayerPipeline::new().extract_page(&document, 0)?;
//!
//! for (layer, text) in layers.text_layers() {
//!     println!("{} at ({}, {}): {}", layer.id, layer.bbox.x, layer.bbox.y, text.text);
//! }
//! println!("{}", layers.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of:
//!
//! * Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or
//!   <http://www.apache.org/licenses/LICENSE-2.0>)
//! * MIT license ([LICENSE-MIT](LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//!
//! at your option.

#![warn(missing_docs)]

// Error handling
pub mod error;

// Coordinate frame
pub mod geometry;

// Input primitives
pub mod primitives;

// Output model
pub mod elements;

// Per-primitive builders
pub mod extractors;

// Layout analysis
pub mod layout;

// Orchestration
pub mod pipeline;

// Re-exports
pub use elements::{Layer, LayerKind, PageLayers};
pub use error::{Error, Result};
pub use pipeline::{ExtractionReport, LayerPipeline, LayerPipelineConfig, PageExtraction};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
