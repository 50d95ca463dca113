//! OCR engine trait.
//!
//! The pipeline treats the engine as a black box that turns a raster into
//! text. Implementations must be `Send + Sync`: the pipeline may issue
//! independent calls from several threads when parallel evaluation is on.

use std::sync::Arc;

use super::types::OcrConfig;
use crate::Result;
use crate::image::RasterImage;

/// Trait for OCR engines.
///
/// # Errors
///
/// `recognize` returns `TextliftError::EngineFailure` when the engine raises
/// or produces malformed output. The pipeline never retries a failed call.
///
/// # Example
///
/// ```rust
/// use textlift::image::RasterImage;
/// use textlift::ocr::{OcrConfig, OcrEngine};
/// use textlift::Result;
///
/// struct FixedText(&'static str);
///
/// impl OcrEngine for FixedText {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn recognize(&self, _image: &RasterImage, _config: &OcrConfig) -> Result<String> {
///         Ok(self.0.to_string())
///     }
/// }
/// ```
pub trait OcrEngine: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Extract raw text from `image`.
    fn recognize(&self, image: &RasterImage, config: &OcrConfig) -> Result<String>;
}

impl<T: OcrEngine + ?Sized> OcrEngine for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, image: &RasterImage, config: &OcrConfig) -> Result<String> {
        (**self).recognize(image, config)
    }
}

impl<T: OcrEngine + ?Sized> OcrEngine for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, image: &RasterImage, config: &OcrConfig) -> Result<String> {
        (**self).recognize(image, config)
    }
}

impl<T: OcrEngine + ?Sized> OcrEngine for &T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn recognize(&self, image: &RasterImage, config: &OcrConfig) -> Result<String> {
        (**self).recognize(image, config)
    }
}
