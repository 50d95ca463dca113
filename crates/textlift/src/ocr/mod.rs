//! OCR engine adapter.
//!
//! The pipeline talks to OCR through the [`OcrEngine`] trait. The bundled
//! implementation, [`TesseractEngine`], runs the `tesseract` binary on a
//! temporary PNG and reads the recognized text from stdout.
//!
//! # Example
//!
//! ```rust,no_run
//! use textlift::core::config::EngineSettings;
//! use textlift::image::RasterImage;
//! use textlift::ocr::{OcrConfig, OcrEngine, TesseractEngine};
//!
//! # fn example() -> textlift::Result<()> {
//! let engine = TesseractEngine::new(&EngineSettings::default())?;
//! let page = RasterImage::new(image::open("scan.png").expect("readable image").to_luma8());
//! let text = engine.recognize(&page, &OcrConfig::default())?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```
pub mod engine;
pub mod tesseract_backend;
pub mod types;
pub mod validation;

pub use engine::OcrEngine;
pub use tesseract_backend::{TESSERACT_CMD_ENV, TesseractEngine, resolve_binary};
pub use types::{EngineMode, OcrConfig, OcrPass, PageSegMode};
pub use validation::{parse_tesseract_version, validate_language_code, validate_tesseract_version};

/// Oldest Tesseract major version with the LSTM engine.
pub const MINIMAL_SUPPORTED_TESSERACT_VERSION: u32 = 4;
