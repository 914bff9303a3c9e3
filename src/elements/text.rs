//! Text layer payload.

use serde::{Deserialize, Serialize};

/// Line height ratio applied to every reconstructed text layer.
pub const DEFAULT_LINE_HEIGHT: f32 = 1.2;

/// A text paragraph with its representative style.
///
/// The style is taken from the first span of the source block; spans with
/// different styling inside the same paragraph are flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    /// Text content; lines are separated by `\n`
    pub text: String,
    /// Font size in points
    pub font_size: f32,
    /// Font family name as reported by the source
    pub font_family: String,
    /// `#rrggbb` color
    pub color: String,
    /// Line height as a multiple of the font size
    #[serde(default = "default_line_height")]
    pub line_height: f32,
}

fn default_line_height() -> f32 {
    DEFAULT_LINE_HEIGHT
}

impl TextLayer {
    /// Create a text payload with the default line height.
    pub fn new(
        text: impl Into<String>,
        font_size: f32,
        font_family: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            font_size,
            font_family: font_family.into(),
            color: color.into(),
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }

    /// Set the line height ratio.
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    /// Number of text lines.
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_count() {
        let layer = TextLayer::new("first\nsecond", 10.0, "Times", "#000000");
        assert_eq!(layer.line_count(), 2);
        assert_eq!(layer.line_height, DEFAULT_LINE_HEIGHT);
    }

    #[test]
    fn test_missing_line_height_defaults() {
        let layer: TextLayer = serde_json::from_str(
            r##"{"text":"a","fontSize":9,"fontFamily":"Arial","color":"#112233"}"##,
        )
        .unwrap();
        assert_eq!(layer.line_height, DEFAULT_LINE_HEIGHT);
        assert_eq!(layer.font_size, 9.0);
    }
}
