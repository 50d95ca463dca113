//! Shared value types: image sources and extraction results.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::core::pipeline::PipelineState;
use crate::image::VariantKind;
use crate::ocr::OcrPass;

/// Where the raw image bytes come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Human-readable identifier used in error messages and logs.
    pub fn label(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Bytes(bytes) => format!("<bytes:{}>", bytes.len()),
        }
    }
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for ImageSource {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

/// One OCR call in the candidate pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub variant: VariantKind,
    pub pass: OcrPass,
    /// `None` when the engine returned no text (score of negative infinity).
    pub score: Option<f64>,
    pub char_count: usize,
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Sanitized winning text; empty when every attempt produced nothing.
    pub content: String,
    /// Winning text exactly as the engine returned it.
    pub raw_content: String,
    /// Winning score, `None` when no attempt produced text.
    pub score: Option<f64>,
    /// Variant that produced the winner, `None` when nothing was recognized.
    pub winner: Option<VariantKind>,
    pub winning_pass: Option<OcrPass>,
    /// Whether the upscaled retry ran.
    pub escalated: bool,
    /// Every attempt in evaluation order.
    pub attempts: Vec<AttemptRecord>,
    /// States the pipeline passed through, ending in `Done`.
    pub stages: Vec<PipelineState>,
    pub source: String,
}

impl ExtractionResult {
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Result for a single file in a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemResult {
    pub file_path: String,
    pub success: bool,
    pub result: Option<ExtractionResult>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_source_labels() {
        assert_eq!(ImageSource::from("scans/page.png").label(), "scans/page.png");
        assert_eq!(ImageSource::from(vec![1u8, 2, 3]).label(), "<bytes:3>");
    }

    #[test]
    fn test_batch_item_result_failure() {
        let item = BatchItemResult {
            file_path: "/path/to/scan.png".to_string(),
            success: false,
            result: None,
            error: Some("Unreadable image".to_string()),
        };
        assert!(!item.success);
        assert!(item.result.is_none());
        assert_eq!(item.error.as_deref(), Some("Unreadable image"));
    }
}
