use image::imageops::FilterType;
use image::{GrayImage, ImageFormat};
use std::path::Path;

use crate::error::{Result, TextliftError};

/// Resampling filter used for every resize in the pipeline.
pub const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// An owned single-channel intensity raster.
///
/// There is no mutable access: every transform in the pipeline consumes a
/// `&RasterImage` and returns a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: GrayImage,
}

impl RasterImage {
    pub fn new(pixels: GrayImage) -> Self {
        Self { pixels }
    }

    /// Build a raster from a per-pixel intensity function.
    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: FnMut(u32, u32) -> image::Luma<u8>,
    {
        Self::new(GrayImage::from_fn(width, height, f))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn longest_side(&self) -> u32 {
        self.width().max(self.height())
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y)[0]
    }

    /// Mean intensity rounded to the nearest integer level.
    pub fn mean_intensity(&self) -> u8 {
        let raw = self.pixels.as_raw();
        if raw.is_empty() {
            return 0;
        }
        let sum: u64 = raw.iter().map(|&v| u64::from(v)).sum();
        ((sum as f64 / raw.len() as f64) + 0.5).floor().min(255.0) as u8
    }

    /// Resize to exact dimensions with the pipeline's resampling filter.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        if (width, height) == self.dimensions() {
            return self.clone();
        }
        Self::new(image::imageops::resize(&self.pixels, width.max(1), height.max(1), RESAMPLE_FILTER))
    }

    /// Apply a lookup to every intensity level.
    pub fn map_levels<F>(&self, f: F) -> Self
    where
        F: Fn(u8) -> u8,
    {
        let lut: Vec<u8> = (0..=255u8).map(&f).collect();
        let mut out = self.pixels.clone();
        for p in out.pixels_mut() {
            p[0] = lut[p[0] as usize];
        }
        Self::new(out)
    }

    /// Write as PNG to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.pixels
            .save_with_format(path.as_ref(), ImageFormat::Png)
            .map_err(|e| {
                TextliftError::engine_failure_with_source(
                    format!("Failed to write raster to {}", path.as_ref().display()),
                    e,
                )
            })
    }
}

impl From<GrayImage> for RasterImage {
    fn from(pixels: GrayImage) -> Self {
        Self::new(pixels)
    }
}
