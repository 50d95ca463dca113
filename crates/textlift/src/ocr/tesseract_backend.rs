//! Tesseract OCR engine driven through its command-line binary.
//!
//! The binary location is resolved once, when the engine is built, from an
//! explicit [`EngineSettings`] value rather than process-global state.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::NamedTempFile;

use super::engine::OcrEngine;
use super::types::OcrConfig;
use super::validation::{parse_tesseract_version, validate_language_code, validate_tesseract_version};
use crate::core::config::EngineSettings;
use crate::image::RasterImage;
use crate::{Result, TextliftError};

/// Environment variable consulted when no explicit binary path is configured.
pub const TESSERACT_CMD_ENV: &str = "TESSERACT_CMD";

const WINDOWS_DEFAULT_PATHS: &[&str] = &[
    r#"C:\Program Files\Tesseract-OCR\tesseract.exe"#,
    r#"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe"#,
];

/// Pick the tesseract binary: explicit setting, `TESSERACT_CMD`, platform default, then `PATH`.
pub fn resolve_binary(settings: &EngineSettings) -> PathBuf {
    if let Some(path) = &settings.tesseract_path {
        return path.clone();
    }

    if let Some(from_env) = std::env::var_os(TESSERACT_CMD_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(from_env);
    }

    if cfg!(windows)
        && let Some(found) = WINDOWS_DEFAULT_PATHS.iter().map(Path::new).find(|p| p.exists())
    {
        return found.to_path_buf();
    }

    PathBuf::from("tesseract")
}

/// OCR engine wrapping the `tesseract` CLI tool.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
    tessdata_dir: Option<PathBuf>,
    extra_args: Vec<String>,
    version: (u32, u32),
}

impl TesseractEngine {
    /// Locate and probe the binary.
    ///
    /// # Errors
    ///
    /// `TextliftError::MissingDependency` if the binary cannot be run or is older than 4.x.
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        let binary = resolve_binary(settings);

        let output = Command::new(&binary).arg("--version").output().map_err(|e| {
            TextliftError::MissingDependency(format!(
                "Cannot run tesseract at '{}': {}. Install Tesseract or set {}",
                binary.display(),
                e,
                TESSERACT_CMD_ENV
            ))
        })?;

        // Older releases print the banner on stderr.
        let banner = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let version = parse_tesseract_version(&banner).ok_or_else(|| {
            TextliftError::MissingDependency(format!(
                "'{}' did not report a tesseract version",
                binary.display()
            ))
        })?;
        validate_tesseract_version(version.0)?;

        tracing::debug!("Using tesseract {}.{} at {}", version.0, version.1, binary.display());

        Ok(Self {
            binary,
            tessdata_dir: settings.tessdata_dir.clone(),
            extra_args: settings.extra_args.clone(),
            version,
        })
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// `(major, minor)` reported by `tesseract --version`.
    pub fn version(&self) -> (u32, u32) {
        self.version
    }

    /// Arguments for recognizing `input`, with text written to stdout.
    pub fn command_args(&self, input: &Path, config: &OcrConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![input.as_os_str().to_owned(), OsString::from("stdout")];
        if let Some(dir) = &self.tessdata_dir {
            args.push(OsString::from("--tessdata-dir"));
            args.push(dir.as_os_str().to_owned());
        }
        args.extend(config.to_args().into_iter().map(OsString::from));
        args.extend(self.extra_args.iter().map(OsString::from));
        args
    }

    /// Languages installed for this binary (`--list-langs`).
    pub fn available_languages(&self) -> Result<Vec<String>> {
        let mut command = Command::new(&self.binary);
        if let Some(dir) = &self.tessdata_dir {
            command.arg("--tessdata-dir").arg(dir);
        }
        let output = command
            .arg("--list-langs")
            .output()
            .map_err(|e| TextliftError::engine_failure_with_source("Failed to list tesseract languages", e))?;
        check_status(&output, "tesseract --list-langs")?;

        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(parse_language_listing(&listing))
    }

    fn run(&self, input: &Path, config: &OcrConfig) -> Result<Output> {
        Command::new(&self.binary)
            .args(self.command_args(input, config))
            .output()
            .map_err(|e| {
                TextliftError::engine_failure_with_source(format!("Failed to execute {}", self.binary.display()), e)
            })
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &RasterImage, config: &OcrConfig) -> Result<String> {
        validate_language_code(&config.language)?;

        let input = NamedTempFile::with_suffix(".png")
            .map_err(|e| TextliftError::engine_failure_with_source("Failed to create temporary image file", e))?;
        image.save_png(input.path())?;

        let output = self.run(input.path(), config)?;
        check_status(&output, "tesseract")?;

        String::from_utf8(output.stdout)
            .map_err(|e| TextliftError::engine_failure_with_source("Tesseract produced non-UTF-8 output", e))
    }
}

fn check_status(output: &Output, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    Err(TextliftError::engine_failure(format!(
        "{} exited with {}: {}",
        what,
        output.status,
        stderr.trim()
    )))
}

/// Parse `--list-langs` output, skipping the header line.
fn parse_language_listing(listing: &str) -> Vec<String> {
    listing
        .lines()
        .filter(|line| !line.starts_with("List of available languages"))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
