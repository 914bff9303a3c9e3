//! Color conversion helpers for layer styling.

use serde::{Deserialize, Serialize};

/// Sentinel used for absent stroke/fill colors.
pub const TRANSPARENT: &str = "transparent";

/// RGB color with 0.0..=1.0 components, as reported for vector drawings.
///
/// Deserializes from a `[r, g, b]` array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a black color.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Create a white color.
    pub fn white() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Format as a lowercase `#rrggbb` string.
    ///
    /// Channels are scaled by 255 and truncated, so 0.999 maps to `fe`.
    ///
    /// # Examples
    ///
    /// ```
    /// use page_layers::elements::Color;
    ///
    /// assert_eq!(Color::new(1.0, 0.5, 0.0).to_hex(), "#ff7f00");
    /// ```
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", channel(self.r), channel(self.g), channel(self.b))
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Color::new(r, g, b)
    }
}

impl From<Color> for [f32; 3] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b]
    }
}

fn channel(value: f32) -> u8 {
    (value * 255.0).clamp(0.0, 255.0) as u8
}

/// Resolve an optional drawing color to a hex string or [`TRANSPARENT`].
pub fn hex_or_transparent(color: Option<Color>) -> String {
    match color {
        Some(c) => c.to_hex(),
        None => TRANSPARENT.to_string(),
    }
}

/// Decode a packed `0xRRGGBB` integer into a `#rrggbb` string.
///
/// # Examples
///
/// ```
/// use page_layers::elements::hex_from_packed;
///
/// assert_eq!(hex_from_packed(0x1a2b3c), "#1a2b3c");
/// ```
pub fn hex_from_packed(packed: u32) -> String {
    let r = (packed >> 16) & 0xFF;
    let g = (packed >> 8) & 0xFF;
    let b = packed & 0xFF;
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
