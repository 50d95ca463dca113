//! Decoding and size normalization.
//!
//! Input of any supported raster format is decoded, reduced to luminance and
//! shrunk so its longest side fits `max_side`. Images already within bounds
//! keep their exact dimensions; this stage never upscales.

use image::{DynamicImage, ImageReader};
use std::io::Cursor;

use super::raster::RasterImage;
use crate::core::io::read_source;
use crate::error::{Result, TextliftError};
use crate::types::ImageSource;

/// Default bound on the longest image side, in pixels.
pub const MAX_SIDE: u32 = 2000;

/// Decode raw bytes into an image.
///
/// `label` identifies the source in the error message.
pub fn decode_image(bytes: &[u8], label: &str) -> Result<DynamicImage> {
    if bytes.is_empty() {
        return Err(TextliftError::unreadable_image(format!("{}: image data is empty", label)));
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| TextliftError::unreadable_image_with_source(format!("{}: cannot read image format", label), e))?;

    if reader.format().is_none() {
        return Err(TextliftError::unreadable_image(format!(
            "{}: unrecognized image format",
            label
        )));
    }

    reader
        .decode()
        .map_err(|e| TextliftError::unreadable_image_with_source(format!("{}: failed to decode image", label), e))
}

/// Target dimensions for an image bounded by `max_side`.
///
/// The longest side becomes exactly `max_side`; the other side is floored.
pub fn scaled_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side || longest == 0 {
        return (width, height);
    }

    let shrink = |side: u32| -> u32 {
        let scaled = u64::from(side) * u64::from(max_side) / u64::from(longest);
        (scaled as u32).max(1)
    };

    (shrink(width), shrink(height))
}

/// Convert to grayscale and bound the longest side.
pub fn normalize(img: &DynamicImage, max_side: u32) -> RasterImage {
    let gray = RasterImage::new(img.to_luma8());
    let (width, height) = gray.dimensions();
    let (target_w, target_h) = scaled_dimensions(width, height, max_side);

    if (target_w, target_h) == (width, height) {
        return gray;
    }

    tracing::debug!(
        "Normalizing {}x{} -> {}x{} (max_side={})",
        width,
        height,
        target_w,
        target_h,
        max_side
    );
    gray.resized(target_w, target_h)
}

/// Read, decode and normalize an image source.
pub fn load_and_normalize(source: &ImageSource, max_side: u32) -> Result<RasterImage> {
    let bytes = read_source(source)?;
    let decoded = decode_image(&bytes, &source.label())?;
    Ok(normalize(&decoded, max_side))
}

/// Enlarge by `factor` with the same resampling filter, flooring each side.
pub fn upscale(img: &RasterImage, factor: f64) -> RasterImage {
    let (width, height) = img.dimensions();
    let target_w = ((f64::from(width) * factor).floor() as u32).max(1);
    let target_h = ((f64::from(height) * factor).floor() as u32).max(1);
    img.resized(target_w, target_h)
}
