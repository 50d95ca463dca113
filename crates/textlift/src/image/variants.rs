//! Competing preprocessing renderings of a normalized image.
//!
//! The soft and hard recipes pull in opposite directions: soft keeps gray
//! mid-tones for faint print, hard binarizes for noisy high-contrast scans.
//! Scoring decides between them after OCR.

use imageproc::filter::median_filter;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::raster::RasterImage;
use crate::core::config::VariantConfig;

/// The recipe that produced a rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    /// The normalized image, untouched.
    Neutral,
    /// Mild contrast boost and median smoothing.
    Soft,
    /// Strong contrast boost, median smoothing and binarization.
    Hard,
    /// The normalized image enlarged for the escalation pass.
    Upscaled,
}

impl VariantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Soft => "soft",
            Self::Hard => "hard",
            Self::Upscaled => "upscaled",
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendering tagged with its recipe.
#[derive(Debug, Clone)]
pub struct Variant {
    pub kind: VariantKind,
    pub image: RasterImage,
}

impl Variant {
    pub fn new(kind: VariantKind, image: RasterImage) -> Self {
        Self { kind, image }
    }
}

/// Scale every level's distance from the mean intensity by `factor`.
///
/// Levels are clamped to 0..=255. A factor of 1.0 is the identity.
pub fn enhance_contrast(img: &RasterImage, factor: f64) -> RasterImage {
    let mean = f64::from(img.mean_intensity());
    img.map_levels(|level| (mean + factor * (f64::from(level) - mean)).clamp(0.0, 255.0) as u8)
}

/// Median filter over a square `window`×`window` neighborhood.
pub fn median_smooth(img: &RasterImage, window: u32) -> RasterImage {
    let radius = window / 2;
    if radius == 0 {
        return img.clone();
    }
    RasterImage::new(median_filter(img.as_gray(), radius, radius))
}

/// Levels strictly above `threshold` become white, the rest black.
pub fn binarize(img: &RasterImage, threshold: u8) -> RasterImage {
    img.map_levels(|level| if level > threshold { 255 } else { 0 })
}

pub fn soft_variant(img: &RasterImage, config: &VariantConfig) -> RasterImage {
    let boosted = enhance_contrast(img, config.soft_contrast);
    median_smooth(&boosted, config.median_window)
}

pub fn hard_variant(img: &RasterImage, config: &VariantConfig) -> RasterImage {
    let boosted = enhance_contrast(img, config.hard_contrast);
    let smoothed = median_smooth(&boosted, config.median_window);
    binarize(&smoothed, config.binarize_threshold)
}

/// Build the ordered variant set: neutral (optional), soft, hard.
pub fn generate_variants(img: &RasterImage, config: &VariantConfig) -> Vec<Variant> {
    let mut variants = Vec::with_capacity(3);
    if config.include_neutral {
        variants.push(Variant::new(VariantKind::Neutral, img.clone()));
    }
    variants.push(Variant::new(VariantKind::Soft, soft_variant(img, config)));
    variants.push(Variant::new(VariantKind::Hard, hard_variant(img, config)));
    variants
}
