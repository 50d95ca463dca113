//! Error types for textlift.
//!
//! Every fallible operation in the crate returns [`TextliftError`]. The
//! taxonomy mirrors the pipeline's failure modes:
//!
//! - `Io` - the image source could not be read from disk (bubbles up unchanged)
//! - `UnreadableImage` - bytes were read but do not decode to a raster image
//! - `EngineFailure` - the OCR engine raised, timed out or produced malformed output
//! - `Validation` - invalid configuration values or language codes
//! - `MissingDependency` - the OCR engine binary could not be located
//!
//! An OCR pass that yields no text is not an error: the pipeline returns an
//! empty string and lets the caller decide how to render it.
//!
//! # Example
//!
//! ```rust
//! use textlift::{Result, TextliftError};
//!
//! fn check_side(max_side: u32) -> Result<u32> {
//!     if max_side == 0 {
//!         return Err(TextliftError::validation("max_side must be positive"));
//!     }
//!     Ok(max_side)
//! }
//!
//! assert!(check_side(0).is_err());
//! ```
use thiserror::Error;

/// Result type alias using `TextliftError`.
pub type Result<T> = std::result::Result<T, TextliftError>;

/// Main error type for all textlift operations.
#[derive(Debug, Error)]
pub enum TextliftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable image: {message}")]
    UnreadableImage {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR engine failure: {message}")]
    EngineFailure {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("{0}")]
    Other(String),
}

impl TextliftError {
    /// True for the two fatal pipeline conditions a caller reports to an end user.
    pub fn is_fatal_pipeline_error(&self) -> bool {
        matches!(self, Self::UnreadableImage { .. } | Self::EngineFailure { .. })
    }

    /// Prefix the message of a structured error with `context` (typically the image identifier).
    pub fn with_context(self, context: &str) -> Self {
        match self {
            Self::UnreadableImage { message, source } => Self::UnreadableImage {
                message: format!("{}: {}", context, message),
                source,
            },
            Self::EngineFailure { message, source } => Self::EngineFailure {
                message: format!("{}: {}", context, message),
                source,
            },
            Self::Validation { message, source } => Self::Validation {
                message: format!("{}: {}", context, message),
                source,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for TextliftError {
    fn from(err: serde_json::Error) -> Self {
        TextliftError::Validation {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<toml::de::Error> for TextliftError {
    fn from(err: toml::de::Error) -> Self {
        TextliftError::Validation {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl TextliftError {
    error_constructor!(unreadable_image, UnreadableImage);
    error_constructor!(engine_failure, EngineFailure);
    error_constructor!(validation, Validation);
}
