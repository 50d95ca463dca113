//! textlift - hybrid OCR for scanned images
//!
//! textlift turns a raster image into the best transcription it can get out of
//! Tesseract. It normalizes the image, renders competing preprocessing
//! variants, OCRs each of them, scores the outputs with a character-class
//! heuristic and keeps the winner. When even the winner looks poor, it retries
//! once on an upscaled copy.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use textlift::extract_text;
//!
//! # fn main() -> textlift::Result<()> {
//! let text = extract_text("receipt.jpg", None)?;
//! println!("{}", text);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Core Module** (`core`): pipeline state machine, entry points, config loading
//! - **Image** (`image`): decoding, normalization and preprocessing variants
//! - **OCR** (`ocr`): the engine trait and the tesseract CLI backend
//! - **Text** (`text`): quality scoring and sanitizing

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod image;
pub mod ocr;
pub mod text;
pub mod types;

pub use error::{Result, TextliftError};
pub use types::*;

pub use core::config::{
    EngineSettings, EscalationConfig, ExtractionConfig, NormalizeConfig, OcrSettings, VariantConfig,
};
pub use core::extractor::{
    batch_extract_file_sync, default_engine, extract_bytes_sync, extract_file_sync, extract_text,
};
pub use core::pipeline::{EscalationController, PipelineState};

#[cfg(feature = "tokio-runtime")]
pub use core::extractor::{extract_bytes, extract_file, extract_source};

pub use ocr::{OcrEngine, TesseractEngine};
