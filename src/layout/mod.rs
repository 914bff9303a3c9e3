//! Layout analysis over reconstructed layers.
//!
//! This module provides the geometric passes that run after the per-primitive
//! builders:
//! - Gutter-based column detection
//! - Line and paragraph merging of text layers
//! - The containment hierarchy between all layers

pub mod column_detector;
pub mod hierarchy;
pub mod text_merger;

// Re-export main types
pub use column_detector::ColumnLayout;
pub use hierarchy::{build_hierarchy, parent_indices};
pub use text_merger::{is_obstructed, TextMerger};
