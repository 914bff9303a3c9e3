//! Raster image layers.
//!
//! Each placement is resolved to decoded samples, composited with its soft
//! mask when it has one, converted to a PNG-compatible color model and
//! embedded as a data URI.
//!
//! # Failure handling
//!
//! - Unresolvable or malformed rasters are skipped ([`SkipReason::Unreadable`]).
//! - A soft mask that cannot be merged is dropped; the unmasked base image is
//!   kept and counted in [`BuildOutput::degraded`].

use std::io::Cursor;

use image::{imageops, DynamicImage, GrayAlphaImage, GrayImage, ImageFormat, RgbImage, RgbaImage};

use crate::elements::{ImageLayer, Layer, LayerKind};
use crate::error::{Error, Result};
use crate::extractors::{BuildOutput, PrimitiveKind, PrimitiveOutcome, SkipReason};
use crate::geometry::Point;
use crate::primitives::{ImageResolver, RasterColorSpace, RasterData, RasterPrimitive};

/// Decoded 8-bit raster with an optional trailing alpha sample per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color model of the non-alpha samples
    pub color_space: RasterColorSpace,
    /// Whether each pixel ends with an alpha sample
    pub alpha: bool,
    /// Interleaved samples, row-major
    pub samples: Vec<u8>,
}

impl Pixmap {
    /// Validate raster data and take it as a pixmap.
    pub fn from_raster(xref: u32, raster: &RasterData) -> Result<Self> {
        if raster.width == 0 || raster.height == 0 {
            return Err(Error::InvalidRaster {
                xref,
                reason: format!("empty dimensions {}x{}", raster.width, raster.height),
            });
        }
        let channels = raster.color_space.components() + usize::from(raster.alpha);
        let expected = (raster.width as usize)
            .checked_mul(raster.height as usize)
            .and_then(|pixels| pixels.checked_mul(channels))
            .ok_or_else(|| Error::InvalidRaster {
                xref,
                reason: "dimensions overflow".to_string(),
            })?;
        if raster.samples.len() != expected {
            return Err(Error::InvalidRaster {
                xref,
                reason: format!("expected {} samples, found {}", expected, raster.samples.len()),
            });
        }
        Ok(Self {
            width: raster.width,
            height: raster.height,
            color_space: raster.color_space,
            alpha: raster.alpha,
            samples: raster.samples.clone(),
        })
    }

    /// Samples per pixel, alpha included.
    pub fn channels(&self) -> usize {
        self.color_space.components() + usize::from(self.alpha)
    }

    /// Number of color samples per pixel, alpha excluded.
    pub fn color_channels(&self) -> usize {
        self.color_space.components()
    }

    /// Convert to RGB, keeping any alpha channel.
    pub fn to_rgb(&self) -> Pixmap {
        if self.color_space == RasterColorSpace::Rgb {
            return self.clone();
        }
        let channels = self.channels();
        let pixels = self.width as usize * self.height as usize;
        let mut samples = Vec::with_capacity(pixels * (3 + usize::from(self.alpha)));
        for px in self.samples.chunks_exact(channels) {
            let (r, g, b) = match self.color_space {
                RasterColorSpace::Gray => (px[0], px[0], px[0]),
                RasterColorSpace::Cmyk => cmyk_to_rgb(px[0], px[1], px[2], px[3]),
                RasterColorSpace::Rgb => (px[0], px[1], px[2]),
            };
            samples.extend_from_slice(&[r, g, b]);
            if self.alpha {
                samples.push(px[channels - 1]);
            }
        }
        Pixmap {
            width: self.width,
            height: self.height,
            color_space: RasterColorSpace::Rgb,
            alpha: self.alpha,
            samples,
        }
    }

    /// Merge a single-channel soft mask in as the alpha channel.
    ///
    /// A mask with different dimensions is resampled to this pixmap's size.
    /// Any existing alpha channel is replaced.
    pub fn with_soft_mask(&self, mask: &Pixmap) -> Result<Pixmap> {
        if self.color_space == RasterColorSpace::Cmyk {
            return Err(Error::Compositing("base image must be gray or RGB".to_string()));
        }
        if mask.color_space != RasterColorSpace::Gray || mask.alpha {
            return Err(Error::Compositing(format!(
                "soft mask must have one channel, found {}",
                mask.channels()
            )));
        }

        let mask_samples = if (mask.width, mask.height) == (self.width, self.height) {
            mask.samples.clone()
        } else {
            let gray = GrayImage::from_raw(mask.width, mask.height, mask.samples.clone())
                .ok_or_else(|| Error::Compositing("soft mask buffer too small".to_string()))?;
            imageops::resize(&gray, self.width, self.height, imageops::FilterType::Triangle)
                .into_raw()
        };

        let channels = self.channels();
        let colors = self.color_channels();
        let mut samples = Vec::with_capacity(mask_samples.len() * (colors + 1));
        for (px, alpha) in self.samples.chunks_exact(channels).zip(&mask_samples) {
            samples.extend_from_slice(&px[..colors]);
            samples.push(*alpha);
        }
        Ok(Pixmap {
            width: self.width,
            height: self.height,
            color_space: self.color_space,
            alpha: true,
            samples,
        })
    }

    /// Wrap the samples in an `image` buffer.
    pub fn to_dynamic_image(&self) -> Result<DynamicImage> {
        let pixmap = if self.color_space == RasterColorSpace::Cmyk {
            self.to_rgb()
        } else {
            self.clone()
        };
        let (w, h) = (pixmap.width, pixmap.height);
        let too_small = || Error::Compositing("sample buffer too small".to_string());
        let image = match (pixmap.color_space, pixmap.alpha) {
            (RasterColorSpace::Gray, false) => DynamicImage::ImageLuma8(
                GrayImage::from_raw(w, h, pixmap.samples).ok_or_else(too_small)?,
            ),
            (RasterColorSpace::Gray, true) => DynamicImage::ImageLumaA8(
                GrayAlphaImage::from_raw(w, h, pixmap.samples).ok_or_else(too_small)?,
            ),
            (_, false) => DynamicImage::ImageRgb8(
                RgbImage::from_raw(w, h, pixmap.samples).ok_or_else(too_small)?,
            ),
            (_, true) => DynamicImage::ImageRgba8(
                RgbaImage::from_raw(w, h, pixmap.samples).ok_or_else(too_small)?,
            ),
        };
        Ok(image)
    }

    /// Encode as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let image = self.to_dynamic_image()?;
        let mut buffer = Cursor::new(Vec::new());
        image.write_to(&mut buffer, ImageFormat::Png)?;
        Ok(buffer.into_inner())
    }
}

fn cmyk_to_rgb(c: u8, m: u8, y: u8, k: u8) -> (u8, u8, u8) {
    let k = 255 - u16::from(k);
    let channel = |v: u8| ((255 - u16::from(v)) * k / 255) as u8;
    (channel(c), channel(m), channel(y))
}

/// A pixmap ready for encoding, plus the reason its soft mask was dropped.
struct Materialized {
    pixmap: Pixmap,
    mask_error: Option<Error>,
}

/// Builds image layers from raster placements.
#[derive(Debug, Clone, Copy)]
pub struct ImageLayerBuilder {
    origin: Point,
}

impl ImageLayerBuilder {
    /// Create a builder for a page whose canvas origin is `origin`.
    pub fn new(origin: Point) -> Self {
        Self { origin }
    }

    /// Convert every placement, skipping the ones that cannot be materialized.
    pub fn build<R: ImageResolver + ?Sized>(
        &self,
        primitives: &[RasterPrimitive],
        resolver: &R,
    ) -> BuildOutput {
        let mut output = BuildOutput::default();
        for (index, primitive) in primitives.iter().enumerate() {
            let (outcome, degraded) = self.convert(primitive, resolver);
            if degraded {
                output.degraded += 1;
            }
            output.push(PrimitiveKind::Image, index, outcome);
        }
        log::debug!(
            "Built {} image layers ({} skipped, {} without mask)",
            output.layers.len(),
            output.skipped.len(),
            output.degraded
        );
        output
    }

    fn convert<R: ImageResolver + ?Sized>(
        &self,
        primitive: &RasterPrimitive,
        resolver: &R,
    ) -> (PrimitiveOutcome, bool) {
        let bbox = primitive.bbox.to_rect();
        if bbox.width <= 0.0 || bbox.height <= 0.0 {
            log::debug!(
                "Skipping image {} with empty placement {:?}",
                primitive.xref,
                primitive.bbox
            );
            return (
                PrimitiveOutcome::Skipped(SkipReason::Unreadable("empty placement".to_string())),
                false,
            );
        }

        let materialized = match materialize(primitive.xref, resolver) {
            Ok(m) => m,
            Err(e) => {
                log::warn!("Skipping image {}: {}", primitive.xref, e);
                return (PrimitiveOutcome::Skipped(SkipReason::Unreadable(e.to_string())), false);
            },
        };
        let degraded = match &materialized.mask_error {
            Some(e) => {
                log::warn!("Failed to merge soft mask for image {}: {}", primitive.xref, e);
                true
            },
            None => false,
        };

        let png = match materialized.pixmap.encode_png() {
            Ok(png) => png,
            Err(e) => {
                log::warn!("Failed to encode image {}: {}", primitive.xref, e);
                return (PrimitiveOutcome::Skipped(SkipReason::Unreadable(e.to_string())), degraded);
            },
        };

        let layer = Layer::new(
            bbox.relative_to(self.origin),
            LayerKind::Image(ImageLayer::from_png(&png)),
        );
        (PrimitiveOutcome::Layer(layer), degraded)
    }
}

fn materialize<R: ImageResolver + ?Sized>(xref: u32, resolver: &R) -> Result<Materialized> {
    let raster = resolver.resolve(xref)?;
    let mut pixmap = Pixmap::from_raster(xref, &raster)?;
    let mut mask_error = None;

    if let Some(smask) = raster.smask {
        let composited = resolver
            .resolve(smask)
            .and_then(|mask| Pixmap::from_raster(smask, &mask))
            .and_then(|mask| {
                let base = if pixmap.color_channels() >= 4 {
                    pixmap.to_rgb()
                } else {
                    pixmap.clone()
                };
                base.with_soft_mask(&mask)
            });
        match composited {
            Ok(p) => pixmap = p,
            Err(e) => mask_error = Some(e),
        }
    }

    if pixmap.color_channels() >= 4 {
        pixmap = pixmap.to_rgb();
    }
    Ok(Materialized { pixmap, mask_error })
}
