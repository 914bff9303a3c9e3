//! Unified configuration for the layer reconstruction pipeline.
//!
//! This module consolidates the thresholds used by each stage:
//! - TextMergeConfig (word, line, column and paragraph thresholds)
//! - PathFilterConfig (background-fill heuristic)
//! - TextStyleConfig (text layer styling)
//! - HierarchyConfig (containment tolerance)
//!
//! Every field has a default, so a partial JSON document only overrides the
//! values it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Thresholds for fusing text blocks into lines and paragraphs.
///
/// Ratios are multiplied by the font size of the run being extended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMergeConfig {
    /// Max `y` difference, as a font-size ratio, for two blocks on one line
    pub line_tolerance_ratio: f32,
    /// Max horizontal gap, as a font-size ratio, between adjacent words
    pub word_gap_ratio: f32,
    /// Horizontal overlap (negative gap) still treated as adjacent
    pub word_overlap_tolerance: f32,
    /// Min gap between left edges, as a page-width ratio, that splits columns
    pub column_gap_ratio: f32,
    /// Max vertical gap, as a font-size ratio, between paragraph lines
    pub paragraph_gap_ratio: f32,
    /// Vertical overlap (negative gap) still treated as a continuation
    pub paragraph_overlap_tolerance: f32,
    /// Factor applied to every merged layer's width
    pub width_padding: f32,
}

impl Default for TextMergeConfig {
    fn default() -> Self {
        Self {
            line_tolerance_ratio: 0.6,
            word_gap_ratio: 1.0,
            word_overlap_tolerance: 3.0,
            column_gap_ratio: 0.15,
            paragraph_gap_ratio: 1.3,
            paragraph_overlap_tolerance: 2.0,
            width_padding: 1.08,
        }
    }
}

/// Background-fill heuristic for vector drawings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathFilterConfig {
    /// Fill colors treated as paper white (lowercase `#rrggbb`)
    pub background_fills: Vec<String>,
    /// Min fraction of page width and height a shape must cover to count as background
    pub background_coverage: f32,
    /// Stroke width used when a drawing does not report one
    pub default_stroke_width: f32,
}

impl Default for PathFilterConfig {
    fn default() -> Self {
        Self {
            background_fills: vec![
                "#ffffff".to_string(),
                "#fefefe".to_string(),
                "#fffffe".to_string(),
            ],
            background_coverage: 0.9,
            default_stroke_width: 1.0,
        }
    }
}

impl PathFilterConfig {
    /// Check whether `fill` is one of the configured background colors.
    pub fn is_background_fill(&self, fill: &str) -> bool {
        self.background_fills
            .iter()
            .any(|c| c.eq_ignore_ascii_case(fill))
    }
}

/// Styling applied to reconstructed text layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyleConfig {
    /// Line height ratio written to every text layer
    pub line_height: f32,
}

impl Default for TextStyleConfig {
    fn default() -> Self {
        Self {
            line_height: crate::elements::DEFAULT_LINE_HEIGHT,
        }
    }
}

/// Containment hierarchy settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyConfig {
    /// How far a child edge may extend past its parent's edge
    pub containment_tolerance: f32,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            containment_tolerance: 2.0,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerPipelineConfig {
    /// Text merge thresholds
    pub merge: TextMergeConfig,
    /// Vector drawing filter
    pub paths: PathFilterConfig,
    /// Text layer styling
    pub text: TextStyleConfig,
    /// Hierarchy settings
    pub hierarchy: HierarchyConfig,
}

impl LayerPipelineConfig {
    /// Create new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text merge thresholds.
    pub fn with_merge(mut self, merge: TextMergeConfig) -> Self {
        self.merge = merge;
        self
    }

    /// Replace the vector drawing filter.
    pub fn with_paths(mut self, paths: PathFilterConfig) -> Self {
        self.paths = paths;
        self
    }

    /// Replace the text layer styling.
    pub fn with_text(mut self, text: TextStyleConfig) -> Self {
        self.text = text;
        self
    }

    /// Set the containment tolerance.
    pub fn with_containment_tolerance(mut self, tolerance: f32) -> Self {
        self.hierarchy.containment_tolerance = tolerance;
        self
    }

    /// Parse a (possibly partial) configuration from JSON and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values that would make a stage meaningless.
    pub fn validate(&self) -> Result<()> {
        let m = &self.merge;
        let positive = [
            ("merge.line_tolerance_ratio", m.line_tolerance_ratio),
            ("merge.word_gap_ratio", m.word_gap_ratio),
            ("merge.column_gap_ratio", m.column_gap_ratio),
            ("merge.paragraph_gap_ratio", m.paragraph_gap_ratio),
            ("merge.width_padding", m.width_padding),
            ("text.line_height", self.text.line_height),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }

        let non_negative = [
            ("merge.word_overlap_tolerance", m.word_overlap_tolerance),
            ("merge.paragraph_overlap_tolerance", m.paragraph_overlap_tolerance),
            ("paths.default_stroke_width", self.paths.default_stroke_width),
            ("hierarchy.containment_tolerance", self.hierarchy.containment_tolerance),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.paths.background_coverage) {
            return Err(Error::InvalidConfig(format!(
                "paths.background_coverage must be within 0..=1, got {}",
                self.paths.background_coverage
            )));
        }
        Ok(())
    }
}
