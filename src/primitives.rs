//! Raw page rendering primitives.
//!
//! These types describe what the primitive-extraction collaborator hands to
//! the pipeline for one page: the visible area and rotation, raster image
//! placements, vector drawings, and the block/line/span text hierarchy.
//! All positions are absolute page coordinates; bounding boxes use the
//! `[x0, y0, x1, y1]` corner form.
//!
//! A [`DocumentSnapshot`] bundles several pages and can be loaded from JSON.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::elements::Color;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, Rotation};

/// Bounding box in corner form.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BBox {
    /// Left
    pub x0: f32,
    /// Top
    pub y0: f32,
    /// Right
    pub x1: f32,
    /// Bottom
    pub y1: f32,
}

impl BBox {
    /// Create a bounding box from its corners.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Convert to a position/size rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::from_points(self.x0, self.y0, self.x1, self.y1)
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

impl From<[f32; 4]> for BBox {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        BBox::new(x0, y0, x1, y1)
    }
}

impl From<BBox> for [f32; 4] {
    fn from(b: BBox) -> Self {
        [b.x0, b.y0, b.x1, b.y1]
    }
}

/// Visible page area and display rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Visible-area rectangle in raw page space
    pub visible_area: BBox,
    /// Display rotation in degrees
    #[serde(default)]
    pub rotation: Rotation,
}

/// Placement of a raster image on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterPrimitive {
    /// Opaque image reference, resolved through an [`ImageResolver`]
    pub xref: u32,
    /// Absolute placement
    pub bbox: BBox,
}

/// Color model of decoded raster samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterColorSpace {
    /// Grayscale (1 component)
    Gray,
    /// RGB color (3 components)
    Rgb,
    /// CMYK color (4 components)
    Cmyk,
}

impl RasterColorSpace {
    /// Get the number of color components (excluding alpha).
    pub fn components(&self) -> usize {
        match self {
            RasterColorSpace::Gray => 1,
            RasterColorSpace::Rgb => 3,
            RasterColorSpace::Cmyk => 4,
        }
    }
}

/// Decoded raster samples behind an image reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color model of the samples
    pub color_space: RasterColorSpace,
    /// Whether each pixel carries a trailing alpha sample
    #[serde(default)]
    pub alpha: bool,
    /// Interleaved 8-bit samples, row-major
    pub samples: Vec<u8>,
    /// Reference of a separate soft mask, if any
    #[serde(default)]
    pub smask: Option<u32>,
}

/// Resolves opaque image references to decoded samples.
///
/// Implemented by whatever owns the decoded document; the pipeline only
/// borrows it for the duration of one page.
pub trait ImageResolver {
    /// Resolve `xref`, failing with [`Error::UnresolvedImage`] if it is unknown
    /// or corrupt.
    fn resolve(&self, xref: u32) -> Result<Cow<'_, RasterData>>;
}

impl ImageResolver for BTreeMap<u32, RasterData> {
    fn resolve(&self, xref: u32) -> Result<Cow<'_, RasterData>> {
        self.get(&xref)
            .map(Cow::Borrowed)
            .ok_or(Error::UnresolvedImage(xref))
    }
}

/// One vector drawing operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DrawOp {
    /// Straight segment
    Line {
        /// Segment start
        from: Point,
        /// Segment end
        to: Point,
    },
    /// Cubic Bezier segment
    Curve {
        /// Start anchor
        from: Point,
        /// First control point
        ctrl1: Point,
        /// Second control point
        ctrl2: Point,
        /// End anchor
        to: Point,
    },
    /// Closed axis-aligned rectangle
    Rect {
        /// Rectangle corners
        rect: BBox,
    },
}

/// One vector drawing with its paint state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingPrimitive {
    /// Absolute bounding rectangle
    pub rect: BBox,
    /// Ordered drawing operations
    #[serde(default)]
    pub items: Vec<DrawOp>,
    /// Stroke color
    #[serde(default)]
    pub stroke: Option<Color>,
    /// Fill color
    #[serde(default)]
    pub fill: Option<Color>,
    /// Stroke width in points
    #[serde(default)]
    pub stroke_width: Option<f32>,
}

/// A run of text with uniform style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Text content
    pub text: String,
    /// Font size in points
    pub size: f32,
    /// Font name
    pub font: String,
    /// Packed `0xRRGGBB` color
    #[serde(default)]
    pub color: u32,
    /// Absolute bounding box
    pub bbox: BBox,
}

/// A line of spans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Aggregate bounding box
    pub bbox: BBox,
    /// Spans in reading order
    #[serde(default)]
    pub spans: Vec<TextSpan>,
}

/// A block of lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Aggregate bounding box
    pub bbox: BBox,
    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<TextLine>,
}

/// The text hierarchy of a page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextPage {
    /// Text blocks
    #[serde(default)]
    pub blocks: Vec<TextBlock>,
}

/// Every primitive of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    /// Visible area and rotation
    pub geometry: PageGeometry,
    /// Raster placements in paint order
    #[serde(default)]
    pub images: Vec<RasterPrimitive>,
    /// Decoded rasters keyed by reference
    #[serde(default)]
    pub rasters: BTreeMap<u32, RasterData>,
    /// Vector drawings in paint order
    #[serde(default)]
    pub drawings: Vec<DrawingPrimitive>,
    /// Text hierarchy
    #[serde(default)]
    pub text: TextPage,
}

impl PageSnapshot {
    /// Create an empty page covering `visible_area`.
    pub fn new(visible_area: BBox, rotation: Rotation) -> Self {
        Self {
            geometry: PageGeometry {
                visible_area,
                rotation,
            },
            images: Vec::new(),
            rasters: BTreeMap::new(),
            drawings: Vec::new(),
            text: TextPage::default(),
        }
    }
}

impl ImageResolver for PageSnapshot {
    fn resolve(&self, xref: u32) -> Result<Cow<'_, RasterData>> {
        self.rasters.resolve(xref)
    }
}

/// Primitives for a whole document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Pages in document order
    pub pages: Vec<PageSnapshot>,
}

impl DocumentSnapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get a page by zero-based index.
    pub fn page(&self, index: usize) -> Result<&PageSnapshot> {
        self.pages.get(index).ok_or(Error::PageNotFound {
            index,
            page_count: self.pages.len(),
        })
    }
}
