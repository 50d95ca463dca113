//! Main extraction entry points.
//!
//! # Functions
//!
//! - [`extract_text`] - One-call extraction with default settings and the system tesseract
//! - [`default_engine`] - The process-wide tesseract used by [`extract_text`]
//! - [`extract_file_sync`] / [`extract_bytes_sync`] - Full results with a caller-supplied engine
//! - [`batch_extract_file_sync`] - Many files in parallel, one result per input
//! - [`extract_file`] / [`extract_bytes`] - Async wrappers with an optional deadline

use std::path::{Path, PathBuf};

#[cfg(feature = "tokio-runtime")]
use std::sync::Arc;
#[cfg(feature = "tokio-runtime")]
use std::time::Duration;

use once_cell::sync::Lazy;
use rayon::prelude::*;

use crate::core::config::{EngineSettings, ExtractionConfig};
use crate::core::pipeline::EscalationController;
use crate::image::load_and_normalize;
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::types::{BatchItemResult, ExtractionResult, ImageSource};
use crate::{Result, TextliftError};

/// Tesseract found with default engine settings, probed on first use.
static DEFAULT_ENGINE: Lazy<std::result::Result<TesseractEngine, String>> =
    Lazy::new(|| {
        TesseractEngine::new(&EngineSettings::default()).map_err(|e| match e {
            TextliftError::MissingDependency(message) => message,
            other => other.to_string(),
        })
    });

/// The shared default engine.
///
/// # Errors
///
/// `TextliftError::MissingDependency` if tesseract could not be found when first probed.
pub fn default_engine() -> Result<&'static TesseractEngine> {
    DEFAULT_ENGINE
        .as_ref()
        .map_err(|message| TextliftError::MissingDependency(message.clone()))
}

/// Extract the best transcription of an image with default settings.
///
/// Uses the built-in defaults with `language` as the OCR language. No
/// configuration file is consulted; load one with
/// [`ExtractionConfig::from_file`] and call [`extract_file_sync`] instead.
/// Tesseract is probed once per process and reused. Returns an empty string
/// when no variant yields text.
///
/// # Errors
///
/// - `TextliftError::Validation` if `language` is not a valid language code
/// - `TextliftError::Io` if the path cannot be read
/// - `TextliftError::UnreadableImage` if the bytes do not decode (no OCR call is made)
/// - `TextliftError::MissingDependency` if tesseract cannot be found
/// - `TextliftError::EngineFailure` if any OCR call fails
///
/// # Example
///
/// ```rust,no_run
/// use textlift::extract_text;
///
/// # fn main() -> textlift::Result<()> {
/// let text = extract_text("scan.png", Some("deu"))?;
/// println!("{}", if text.is_empty() { "[EMPTY]" } else { &text });
/// # Ok(())
/// # }
/// ```
pub fn extract_text(source: impl Into<ImageSource>, language: Option<&str>) -> Result<String> {
    let mut config = ExtractionConfig::default();
    if let Some(language) = language {
        config = config.with_language(language);
    }
    config.validate()?;

    let source = source.into();
    let label = source.label();
    let normalized = load_and_normalize(&source, config.normalize.max_side)?;

    let controller = EscalationController::new(default_engine()?, config)?;
    Ok(controller.run_normalized(&normalized, &label)?.content)
}

/// Extract from a file with an explicit configuration and engine.
pub fn extract_file_sync<E: OcrEngine>(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
    engine: &E,
) -> Result<ExtractionResult> {
    let controller = EscalationController::new(engine, config.clone())?;
    controller.run(&ImageSource::Path(path.as_ref().to_path_buf()))
}

/// Extract from in-memory encoded image bytes.
pub fn extract_bytes_sync<E: OcrEngine>(
    content: &[u8],
    config: &ExtractionConfig,
    engine: &E,
) -> Result<ExtractionResult> {
    let controller = EscalationController::new(engine, config.clone())?;
    controller.run(&ImageSource::Bytes(content.to_vec()))
}

/// Extract many files in parallel.
///
/// Returns one item per input path in input order. A failing file is
/// reported in its item and does not stop the rest of the batch.
///
/// # Errors
///
/// `TextliftError::Validation` if `config` is invalid; per-file failures are
/// recorded in the returned items instead.
pub fn batch_extract_file_sync<E, P>(paths: &[P], config: &ExtractionConfig, engine: &E) -> Result<Vec<BatchItemResult>>
where
    E: OcrEngine,
    P: AsRef<Path> + Sync,
{
    let controller = EscalationController::new(engine, config.clone())?;

    Ok(paths
        .par_iter()
        .map(|path| {
            let path: PathBuf = path.as_ref().to_path_buf();
            let file_path = path.display().to_string();
            match controller.run(&ImageSource::Path(path)) {
                Ok(result) => BatchItemResult {
                    file_path,
                    success: true,
                    result: Some(result),
                    error: None,
                },
                Err(e) => {
                    tracing::warn!("Batch item {} failed: {}", file_path, e);
                    BatchItemResult {
                        file_path,
                        success: false,
                        result: None,
                        error: Some(e.to_string()),
                    }
                }
            }
        })
        .collect())
}

/// Run the pipeline on the blocking pool, optionally bounded by `deadline`.
///
/// # Errors
///
/// `TextliftError::EngineFailure` if the deadline elapses. The OCR work already
/// running on the blocking pool is detached, not killed.
#[cfg(feature = "tokio-runtime")]
pub async fn extract_source<E>(
    source: ImageSource,
    config: ExtractionConfig,
    engine: Arc<E>,
    deadline: Option<Duration>,
) -> Result<ExtractionResult>
where
    E: OcrEngine + ?Sized + 'static,
{
    let label = source.label();
    let task = tokio::task::spawn_blocking(move || {
        let controller = EscalationController::new(engine, config)?;
        controller.run(&source)
    });

    let joined = match deadline {
        Some(limit) => tokio::time::timeout(limit, task).await.map_err(|_| {
            TextliftError::engine_failure(format!("{}: extraction exceeded deadline of {:?}", label, limit))
        })?,
        None => task.await,
    };

    joined.map_err(|e| TextliftError::Other(format!("Extraction task for {} failed: {}", label, e)))?
}

/// Async version of [`extract_file_sync`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use textlift::core::config::ExtractionConfig;
/// use textlift::extract_file;
/// use textlift::ocr::TesseractEngine;
///
/// # async fn example() -> textlift::Result<()> {
/// let config = ExtractionConfig::default();
/// let engine = Arc::new(TesseractEngine::new(&config.engine)?);
/// let result = extract_file("scan.png", &config, engine, Some(Duration::from_secs(30))).await?;
/// println!("{}", result.content);
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "tokio-runtime")]
pub async fn extract_file<E>(
    path: impl AsRef<Path>,
    config: &ExtractionConfig,
    engine: Arc<E>,
    deadline: Option<Duration>,
) -> Result<ExtractionResult>
where
    E: OcrEngine + ?Sized + 'static,
{
    let source = ImageSource::Path(path.as_ref().to_path_buf());
    extract_source(source, config.clone(), engine, deadline).await
}

/// Async version of [`extract_bytes_sync`].
#[cfg(feature = "tokio-runtime")]
pub async fn extract_bytes<E>(
    content: Vec<u8>,
    config: &ExtractionConfig,
    engine: Arc<E>,
    deadline: Option<Duration>,
) -> Result<ExtractionResult>
where
    E: OcrEngine + ?Sized + 'static,
{
    extract_source(ImageSource::Bytes(content), config.clone(), engine, deadline).await
}
