//! Image layer payload.
//!
//! Images are always embedded as PNG data URIs so that transparency survives
//! and consumers never need to sniff the format.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Prefix of every embedded image payload.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// An embedded raster image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageLayer {
    /// `data:image/png;base64,...` payload
    pub src: String,
    /// Rotation in degrees (always 0 for extracted images)
    #[serde(default)]
    pub rotation: f32,
}

impl ImageLayer {
    /// Wrap PNG bytes as a data URI payload.
    pub fn from_png(png: &[u8]) -> Self {
        Self {
            src: format!("{}{}", PNG_DATA_URI_PREFIX, BASE64.encode(png)),
            rotation: 0.0,
        }
    }

    /// Decode the payload back to PNG bytes.
    pub fn decode_src(&self) -> Result<Vec<u8>> {
        let encoded = self
            .src
            .strip_prefix(PNG_DATA_URI_PREFIX)
            .ok_or_else(|| Error::InvalidPayload("expected a PNG data URI".to_string()))?;
        BASE64
            .decode(encoded)
            .map_err(|e| Error::InvalidPayload(e.to_string()))
    }
}
