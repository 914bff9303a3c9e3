//! Reconstructed page layers.
//!
//! This module provides the output model of the reconstruction pipeline.
//!
//! ## Design
//!
//! A [`Layer`] hoists the fields every layer shares (id, bounding box,
//! parent link) into one record and carries the kind-specific payload in
//! the [`LayerKind`] enum. Serialized, the two are flattened into a single
//! JSON object tagged by `"type"`:
//!
//! ```text
//! { "id": "layer-0", "x": 0, "y": 0, "width": 10, "height": 10,
//!   "parentId": null, "type": "text", "text": "...", "fontSize": 12, ... }
//! ```
//!
//! The same schema is accepted back, so an edited layer list can be handed
//! to a page generator unchanged.

mod color;
mod image;
mod path;
mod text;

pub use color::{hex_from_packed, hex_or_transparent, Color, TRANSPARENT};
pub use image::{ImageLayer, PNG_DATA_URI_PREFIX};
pub use path::{format_path_data, PathCommand, PathLayer};
pub use text::{TextLayer, DEFAULT_LINE_HEIGHT};

use serde::{Deserialize, Serialize};

use crate::geometry::{Canvas, Rect};

/// One independently positioned and styled visual unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    /// Unique id within a page result (empty until ids are assigned)
    pub id: String,
    /// Canvas-relative bounding box
    #[serde(flatten)]
    pub bbox: Rect,
    /// Id of the smallest layer that strictly contains this one
    #[serde(default)]
    pub parent_id: Option<String>,
    /// Kind-specific payload
    #[serde(flatten)]
    pub kind: LayerKind,
}

/// Kind-specific layer payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LayerKind {
    /// Text paragraph
    Text(TextLayer),
    /// Raster image
    Image(ImageLayer),
    /// Vector path
    Path(PathLayer),
}

impl Layer {
    /// Create a layer without an id or parent.
    pub fn new(bbox: Rect, kind: LayerKind) -> Self {
        Self {
            id: String::new(),
            bbox,
            parent_id: None,
            kind,
        }
    }

    /// The `"type"` tag of this layer.
    pub fn layer_type(&self) -> &'static str {
        match self.kind {
            LayerKind::Text(_) => "text",
            LayerKind::Image(_) => "image",
            LayerKind::Path(_) => "path",
        }
    }

    /// Check if this is a text layer.
    pub fn is_text(&self) -> bool {
        matches!(self.kind, LayerKind::Text(_))
    }

    /// Check if this is an image layer.
    pub fn is_image(&self) -> bool {
        matches!(self.kind, LayerKind::Image(_))
    }

    /// Check if this is a path layer.
    pub fn is_path(&self) -> bool {
        matches!(self.kind, LayerKind::Path(_))
    }

    /// Get as text payload if this is a text layer.
    pub fn as_text(&self) -> Option<&TextLayer> {
        match &self.kind {
            LayerKind::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Get as image payload if this is an image layer.
    pub fn as_image(&self) -> Option<&ImageLayer> {
        match &self.kind {
            LayerKind::Image(i) => Some(i),
            _ => None,
        }
    }

    /// Get as path payload if this is a path layer.
    pub fn as_path(&self) -> Option<&PathLayer> {
        match &self.kind {
            LayerKind::Path(p) => Some(p),
            _ => None,
        }
    }
}

/// Assign sequential ids (`layer-0`, `layer-1`, ...) in array order.
pub fn assign_ids(layers: &mut [Layer]) {
    for (i, layer) in layers.iter_mut().enumerate() {
        layer.id = format!("layer-{}", i);
    }
}

/// The complete reconstruction result for one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayers {
    /// Canvas width
    pub width: f32,
    /// Canvas height
    pub height: f32,
    /// Layers in z-order: images, then paths, then text
    pub layers: Vec<Layer>,
}

impl PageLayers {
    /// Create a result for `canvas`.
    pub fn new(canvas: Canvas, layers: Vec<Layer>) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            layers,
        }
    }

    /// Look up a layer by id.
    pub fn layer(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// All layers carrying the given `"type"` tag.
    pub fn layers_of_type<'a>(&'a self, layer_type: &'a str) -> impl Iterator<Item = &'a Layer> {
        self.layers
            .iter()
            .filter(move |l| l.layer_type() == layer_type)
    }

    /// Text layers in array order.
    pub fn text_layers(&self) -> impl Iterator<Item = (&Layer, &TextLayer)> {
        self.layers
            .iter()
            .filter_map(|l| l.as_text().map(|t| (l, t)))
    }

    /// Layers without a parent.
    pub fn roots(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|l| l.parent_id.is_none())
    }

    /// Direct children of the layer with id `id`.
    pub fn children_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Layer> {
        self.layers
            .iter()
            .filter(move |l| l.parent_id.as_deref() == Some(id))
    }

    /// Number of ancestors above the layer with id `id`.
    ///
    /// Returns `None` if the id is unknown or the parent chain is broken or
    /// revisits a layer.
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let mut current = self.layer(id)?;
        let mut depth = 0;
        while let Some(parent_id) = current.parent_id.as_deref() {
            depth += 1;
            if depth > self.layers.len() {
                return None;
            }
            current = self.layer(parent_id)?;
        }
        Some(depth)
    }

    /// Serialize to the JSON layer schema.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serialize to indented JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a layer document produced by [`PageLayers::to_json`] or edited
    /// by a client.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(bbox: Rect, content: &str) -> Layer {
        Layer::new(bbox, LayerKind::Text(TextLayer::new(content, 12.0, "Helvetica", "#000000")))
    }

    fn path(bbox: Rect) -> Layer {
        Layer::new(
            bbox,
            LayerKind::Path(PathLayer {
                d: "M 0 0 L 10 0".to_string(),
                fill: TRANSPARENT.to_string(),
                stroke: "#000000".to_string(),
                stroke_width: 1.0,
            }),
        )
    }

    #[test]
    fn test_layer_type_checks() {
        let layer = text(Rect::new(0.0, 0.0, 10.0, 10.0), "Hi");
        assert!(layer.is_text());
        assert!(!layer.is_image());
        assert!(!layer.is_path());
        assert_eq!(layer.layer_type(), "text");
        assert!(layer.as_text().is_some());
        assert!(layer.as_path().is_none());
    }

    #[test]
    fn test_assign_ids_sequential() {
        let mut layers = vec![
            path(Rect::new(0.0, 0.0, 5.0, 5.0)),
            text(Rect::new(0.0, 0.0, 5.0, 5.0), "a"),
        ];
        assign_ids(&mut layers);
        assert_eq!(layers[0].id, "layer-0");
        assert_eq!(layers[1].id, "layer-1");
    }

    #[test]
    fn test_serialized_schema() {
        let mut layer = text(Rect::new(1.0, 2.0, 30.0, 14.0), "Hello");
        layer.id = "layer-3".to_string();
        let json = serde_json::to_value(&layer).unwrap();

        assert_eq!(json["id"], "layer-3");
        assert_eq!(json["type"], "text");
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["width"], 30.0);
        assert!(json["parentId"].is_null());
        assert_eq!(json["fontSize"], 12.0);
        assert_eq!(json["fontFamily"], "Helvetica");
        assert_eq!(json["color"], "#000000");
        assert!((json["lineHeight"].as_f64().unwrap() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_path_schema_uses_stroke_width_key() {
        let json = serde_json::to_value(path(Rect::new(0.0, 0.0, 10.0, 1.0))).unwrap();
        assert_eq!(json["type"], "path");
        assert_eq!(json["strokeWidth"], 1.0);
        assert_eq!(json["fill"], "transparent");
    }

    #[test]
    fn test_page_layers_json_round_trip() {
        let mut layers = vec![
            path(Rect::new(0.0, 0.0, 100.0, 100.0)),
            text(Rect::new(10.0, 10.0, 20.0, 10.0), "x"),
        ];
        assign_ids(&mut layers);
        layers[1].parent_id = Some("layer-0".to_string());
        let page = PageLayers::new(Canvas { width: 200.0, height: 300.0 }, layers);

        let parsed = PageLayers::from_json(&page.to_json().unwrap()).unwrap();
        assert_eq!(parsed, page);
    }

    #[test]
    fn test_tree_navigation() {
        let mut layers = vec![
            path(Rect::new(0.0, 0.0, 100.0, 100.0)),
            path(Rect::new(5.0, 5.0, 50.0, 50.0)),
            text(Rect::new(10.0, 10.0, 20.0, 10.0), "x"),
        ];
        assign_ids(&mut layers);
        layers[1].parent_id = Some("layer-0".to_string());
        layers[2].parent_id = Some("layer-1".to_string());
        let page = PageLayers::new(Canvas { width: 100.0, height: 100.0 }, layers);

        assert_eq!(page.roots().count(), 1);
        assert_eq!(page.children_of("layer-0").count(), 1);
        assert_eq!(page.depth_of("layer-2"), Some(2));
        assert_eq!(page.depth_of("missing"), None);
        assert_eq!(page.layers_of_type("path").count(), 2);
        assert_eq!(page.text_layers().count(), 1);
    }

    #[test]
    fn test_depth_of_detects_cycle() {
        let unit = Rect::new(0.0, 0.0, 1.0, 1.0);
        let mut layers = vec![path(unit), path(unit)];
        assign_ids(&mut layers);
        layers[0].parent_id = Some("layer-1".to_string());
        layers[1].parent_id = Some("layer-0".to_string());
        let page = PageLayers::new(Canvas { width: 1.0, height: 1.0 }, layers);
        assert_eq!(page.depth_of("layer-0"), None);
    }
}
