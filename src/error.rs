//! Error types for layer reconstruction.
//!
//! Only page-level failures escape the pipeline. Errors raised while
//! materializing a single primitive are turned into skip records by the
//! builders in [`crate::extractors`].

/// Result type alias for layer reconstruction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconstructing page layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Requested page index is outside the document
    #[error("Page {index} not found (document has {page_count} pages)")]
    PageNotFound {
        /// Requested zero-based page index
        index: usize,
        /// Number of pages available
        page_count: usize,
    },

    /// Raster reference could not be resolved to pixel data
    #[error("Image reference {0} could not be resolved")]
    UnresolvedImage(u32),

    /// Raster data is inconsistent with its declared layout
    #[error("Invalid raster data for image {xref}: {reason}")]
    InvalidRaster {
        /// Opaque raster reference
        xref: u32,
        /// What was wrong with the samples
        reason: String,
    },

    /// Soft mask could not be merged into its base image
    #[error("Soft mask compositing failed: {0}")]
    Compositing(String),

    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Image payload is not a valid data URI
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
