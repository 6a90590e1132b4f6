//! Ambient light field.
//!
//! An RGB image is stretched over the arena so that its width spans the
//! arena width (the same scale is used vertically).  Image row 0 is the top
//! of the picture while arena `y = 0` is the bottom, so rows are flipped.
//!
//! Readings emulate the robots' 10-bit light sensor: the pixel's luminosity
//! `0.3 R + 0.59 G + 0.11 B` (0–255), truncated to an integer and scaled by 4.
//! Without an image every reading is 0.

use std::path::Path;

use image::RgbImage;
use tracing::info;

use crate::SpatialResult;

/// Light field sampled by agents' ambient-light sensors.
#[derive(Clone, Debug, Default)]
pub struct LightPattern {
    image: Option<RgbImage>,
    scale: f64,
}

impl LightPattern {
    /// No light source; every reading is 0.
    pub fn dark() -> Self {
        Self::default()
    }

    /// Load an image file (PNG or BMP) spanning an arena `arena_width` wide.
    pub fn from_path(path: impl AsRef<Path>, arena_width: f64) -> SpatialResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgb8();
        info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "loaded light pattern"
        );
        Ok(Self::from_image(image, arena_width))
    }

    /// Use an in-memory image.
    pub fn from_image(image: RgbImage, arena_width: f64) -> Self {
        let scale = if arena_width > 0.0 { image.width() as f64 / arena_width } else { 0.0 };
        Self { image: Some(image), scale }
    }

    /// `true` when an image is loaded.
    #[inline]
    pub fn has_source(&self) -> bool {
        self.image.is_some()
    }

    /// Light level at arena point `(x, y)`, in `[0, 1020]`.  Points past the
    /// edge of the image read the nearest border pixel.
    pub fn ambient_light(&self, x: f64, y: f64) -> u16 {
        let Some(image) = &self.image else {
            return 0;
        };
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return 0;
        }
        let px = ((x * self.scale).floor().max(0.0) as u32).min(w - 1);
        let py = ((y * self.scale).floor().max(0.0) as u32).min(h - 1);
        let [r, g, b] = image.get_pixel(px, h - py - 1).0;
        let luminosity = 0.3 * r as f64 + 0.59 * g as f64 + 0.11 * b as f64;
        (luminosity as u16) * 4
    }
}
