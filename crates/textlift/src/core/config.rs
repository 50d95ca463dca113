//! Configuration loading and management.
//!
//! `ExtractionConfig` can be built programmatically, loaded from TOML or JSON,
//! or discovered as `textlift.toml` in the current directory or any parent.
//! Every field has a default, so a config file only needs the keys it changes.

use crate::ocr::{EngineMode, OcrPass, PageSegMode, validate_language_code};
use crate::{Result, TextliftError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file searched for by [`ExtractionConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "textlift.toml";

/// Main extraction configuration.
///
/// # Example
///
/// ```rust
/// use textlift::core::config::ExtractionConfig;
///
/// let config = ExtractionConfig::default();
/// assert_eq!(config.normalize.max_side, 2000);
/// assert_eq!(config.escalation.quality_threshold, 25.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub variants: VariantConfig,

    #[serde(default)]
    pub escalation: EscalationConfig,

    #[serde(default)]
    pub ocr: OcrSettings,

    #[serde(default)]
    pub engine: EngineSettings,

    /// Run the OCR calls of one pass in parallel. Winner selection is unaffected.
    #[serde(default)]
    pub parallel_variants: bool,
}

/// Size normalization options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Longest allowed side after normalization, in pixels.
    #[serde(default = "default_max_side")]
    pub max_side: u32,
}

/// Preprocessing variant options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Evaluate the untouched normalized image before the soft and hard variants.
    #[serde(default = "default_true")]
    pub include_neutral: bool,

    #[serde(default = "default_soft_contrast")]
    pub soft_contrast: f64,

    #[serde(default = "default_hard_contrast")]
    pub hard_contrast: f64,

    /// Side of the square median neighborhood. Must be odd.
    #[serde(default = "default_median_window")]
    pub median_window: u32,

    /// Hard variant binarization level on the 0-255 scale.
    #[serde(default = "default_binarize_threshold")]
    pub binarize_threshold: u8,
}

/// Upscaled retry options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Escalation runs only when the best first-pass score is below this.
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,

    #[serde(default = "default_upscale_factor")]
    pub upscale_factor: f64,
}

/// OCR language and the engine configurations tried per variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrSettings {
    /// Language code (e.g., "eng", "deu", "eng+fra")
    #[serde(default = "default_eng")]
    pub language: String,

    #[serde(default = "default_passes")]
    pub passes: Vec<OcrPass>,
}

/// Location and invocation of the tesseract binary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Explicit binary path. When unset, `TESSERACT_CMD`, platform defaults and `PATH` are tried.
    #[serde(default)]
    pub tesseract_path: Option<PathBuf>,

    #[serde(default)]
    pub tessdata_dir: Option<PathBuf>,

    /// Extra arguments appended to every invocation.
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_eng() -> String {
    "eng".to_string()
}
fn default_max_side() -> u32 {
    crate::image::MAX_SIDE
}
fn default_soft_contrast() -> f64 {
    1.5
}
fn default_hard_contrast() -> f64 {
    2.2
}
fn default_median_window() -> u32 {
    3
}
fn default_binarize_threshold() -> u8 {
    160
}
fn default_quality_threshold() -> f64 {
    25.0
}
fn default_upscale_factor() -> f64 {
    1.5
}
fn default_passes() -> Vec<OcrPass> {
    vec![OcrPass {
        engine_mode: EngineMode::Default,
        psm: PageSegMode::SingleBlock,
    }]
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            max_side: default_max_side(),
        }
    }
}

impl Default for VariantConfig {
    fn default() -> Self {
        Self {
            include_neutral: true,
            soft_contrast: default_soft_contrast(),
            hard_contrast: default_hard_contrast(),
            median_window: default_median_window(),
            binarize_threshold: default_binarize_threshold(),
        }
    }
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            quality_threshold: default_quality_threshold(),
            upscale_factor: default_upscale_factor(),
        }
    }
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: default_eng(),
            passes: default_passes(),
        }
    }
}

impl ExtractionConfig {
    /// Copy of this config with a different OCR language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.ocr.language = language.into();
        self
    }

    /// Check every value the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns `TextliftError::Validation` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.normalize.max_side == 0 {
            return Err(TextliftError::validation("normalize.max_side must be positive"));
        }

        let v = &self.variants;
        for (name, factor) in [("soft_contrast", v.soft_contrast), ("hard_contrast", v.hard_contrast)] {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(TextliftError::validation(format!(
                    "variants.{} must be a positive finite number, got {}",
                    name, factor
                )));
            }
        }
        if v.median_window == 0 || v.median_window % 2 == 0 {
            return Err(TextliftError::validation(format!(
                "variants.median_window must be odd, got {}",
                v.median_window
            )));
        }

        let e = &self.escalation;
        if !e.quality_threshold.is_finite() {
            return Err(TextliftError::validation("escalation.quality_threshold must be finite"));
        }
        if !e.upscale_factor.is_finite() || e.upscale_factor <= 1.0 {
            return Err(TextliftError::validation(format!(
                "escalation.upscale_factor must be greater than 1.0, got {}",
                e.upscale_factor
            )));
        }

        if self.ocr.passes.is_empty() {
            return Err(TextliftError::validation("ocr.passes must contain at least one pass"));
        }
        validate_language_code(&self.ocr.language)?;

        Ok(())
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `TextliftError::Validation` if the file cannot be read or is invalid TOML.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TextliftError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        toml::from_str(&content)
            .map_err(|e| TextliftError::validation(format!("Invalid TOML in {}: {}", path.as_ref().display(), e)))
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            TextliftError::validation(format!("Failed to read config file {}: {}", path.as_ref().display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| TextliftError::validation(format!("Invalid JSON in {}: {}", path.as_ref().display(), e)))
    }

    /// Load by extension: `.json` as JSON, anything else as TOML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let is_json = path
            .as_ref()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_toml_file(path)
        }
    }

    /// Discover `textlift.toml` in the current directory or its parents.
    ///
    /// # Returns
    ///
    /// - `Some(config)` if found
    /// - `None` if no config file found
    pub fn discover() -> Result<Option<Self>> {
        let mut current = std::env::current_dir().map_err(TextliftError::Io)?;

        loop {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                tracing::debug!("Using configuration from {}", candidate.display());
                return Ok(Some(Self::from_toml_file(candidate)?));
            }

            if let Some(parent) = current.parent() {
                current = parent.to_path_buf();
            } else {
                break;
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ExtractionConfig::default();
        assert_eq!(config.normalize.max_side, 2000);
        assert!(config.variants.include_neutral);
        assert_eq!(config.variants.soft_contrast, 1.5);
        assert_eq!(config.variants.hard_contrast, 2.2);
        assert_eq!(config.variants.median_window, 3);
        assert_eq!(config.variants.binarize_threshold, 160);
        assert!(config.escalation.enabled);
        assert_eq!(config.escalation.upscale_factor, 1.5);
        assert_eq!(config.ocr.language, "eng");
        assert_eq!(config.ocr.passes.len(), 1);
        assert_eq!(config.ocr.passes[0].psm, PageSegMode::SingleBlock);
        assert_eq!(config.ocr.passes[0].engine_mode, EngineMode::Default);
        assert!(!config.parallel_variants);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_file_partial() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("textlift.toml");

        fs::write(
            &config_path,
            r#"
parallel_variants = true

[escalation]
quality_threshold = 40.0

[ocr]
language = "deu"
passes = [
    { engine_mode = 1, psm = 6 },
    { engine_mode = 3, psm = 4 },
]
        "#,
        )
        .unwrap();

        let config = ExtractionConfig::from_toml_file(&config_path).unwrap();
        assert!(config.parallel_variants);
        assert_eq!(config.escalation.quality_threshold, 40.0);
        assert_eq!(config.escalation.upscale_factor, 1.5);
        assert_eq!(config.ocr.language, "deu");
        assert_eq!(config.ocr.passes.len(), 2);
        assert_eq!(config.ocr.passes[0].engine_mode, EngineMode::LstmOnly);
        assert_eq!(config.ocr.passes[1].psm, PageSegMode::SingleColumn);
        assert_eq!(config.normalize.max_side, 2000);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("textlift.json");
        fs::write(&config_path, r#"{"normalize": {"max_side": 1200}, "engine": {"extra_args": ["--dpi", "300"]}}"#)
            .unwrap();

        let config = ExtractionConfig::from_file(&config_path).unwrap();
        assert_eq!(config.normalize.max_side, 1200);
        assert_eq!(config.engine.extra_args, vec!["--dpi".to_string(), "300".to_string()]);
    }

    #[test]
    fn test_invalid_toml_is_validation_error() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("textlift.toml");
        fs::write(&config_path, "[normalize\nmax_side = ").unwrap();

        let err = ExtractionConfig::from_toml_file(&config_path).unwrap_err();
        assert!(matches!(err, TextliftError::Validation { .. }));
    }

    #[test]
    fn test_invalid_psm_value_rejected() {
        let result: std::result::Result<ExtractionConfig, _> =
            toml::from_str("[ocr]\npasses = [{ engine_mode = 3, psm = 99 }]");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_even_median_window() {
        let mut config = ExtractionConfig::default();
        config.variants.median_window = 4;
        assert!(matches!(config.validate(), Err(TextliftError::Validation { .. })));
    }

    #[test]
    fn test_validate_rejects_non_enlarging_upscale() {
        let mut config = ExtractionConfig::default();
        config.escalation.upscale_factor = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_max_side() {
        let mut config = ExtractionConfig::default();
        config.normalize.max_side = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_passes() {
        let mut config = ExtractionConfig::default();
        config.ocr.passes.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_language() {
        let config = ExtractionConfig::default().with_language("english!");
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_discover_textlift_toml() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("scans").join("2024");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[normalize]\nmax_side = 1500\n").unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&nested).unwrap();

        let result = std::panic::catch_unwind(|| {
            let config = ExtractionConfig::discover().unwrap();
            assert_eq!(config.unwrap().normalize.max_side, 1500);
        });

        std::env::set_current_dir(&original_dir).unwrap();

        if let Err(e) = result {
            std::panic::resume_unwind(e);
        }
    }
}
