use once_cell::sync::Lazy;
use regex::Regex;

use super::MINIMAL_SUPPORTED_TESSERACT_VERSION;
use crate::{Result, TextliftError};

static LANGUAGE_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z]{3}(?:_[a-z0-9]+)*$").expect("Language code regex pattern is valid and should compile")
});

static VERSION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*tesseract\s+v?(\d+)(?:\.(\d+))?").expect("Tesseract version regex pattern is valid and should compile")
});

/// Validate a `+`-joined list of Tesseract language codes (e.g. `eng`, `chi_sim`, `eng+deu`).
pub fn validate_language_code(language: &str) -> Result<()> {
    let trimmed = language.trim();
    if trimmed.is_empty() {
        return Err(TextliftError::validation(
            "Language cannot be empty. Please specify a valid language code (e.g., 'eng')",
        ));
    }

    for code in trimmed.split('+') {
        if !LANGUAGE_CODE.is_match(code) {
            return Err(TextliftError::validation(format!(
                "Invalid language code '{}' in '{}'",
                code, language
            )));
        }
    }

    Ok(())
}

/// Parse `(major, minor)` from `tesseract --version` output.
pub fn parse_tesseract_version(output: &str) -> Option<(u32, u32)> {
    let caps = VERSION_LINE.captures(output)?;
    let major = caps.get(1)?.as_str().parse().ok()?;
    let minor = caps.get(2).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
    Some((major, minor))
}

/// Reject Tesseract releases without the LSTM engine.
pub fn validate_tesseract_version(major: u32) -> Result<()> {
    if major < MINIMAL_SUPPORTED_TESSERACT_VERSION {
        return Err(TextliftError::MissingDependency(format!(
            "Tesseract {} or newer is required, found major version {}",
            MINIMAL_SUPPORTED_TESSERACT_VERSION, major
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_language_codes() {
        for code in ["eng", "deu", "chi_sim", "eng+deu", "aze_cyrl+eng", "kat_old"] {
            assert!(validate_language_code(code).is_ok(), "{} should be valid", code);
        }
    }

    #[test]
    fn test_invalid_language_codes() {
        for code in ["", "   ", "en", "english", "ENG", "eng+", "+eng", "eng deu", "../eng"] {
            assert!(validate_language_code(code).is_err(), "{:?} should be rejected", code);
        }
    }

    #[test]
    fn test_parse_tesseract_version() {
        let output = "tesseract 5.3.4\n leptonica-1.84.1\n  libgif 5.2.1 : libjpeg 8d\n";
        assert_eq!(parse_tesseract_version(output), Some((5, 3)));
        assert_eq!(parse_tesseract_version("tesseract v4.1.1-rc2-21-gf4ef\n"), Some((4, 1)));
        assert_eq!(parse_tesseract_version("tesseract 3\n"), Some((3, 0)));
        assert_eq!(parse_tesseract_version("command not found"), None);
    }

    #[test]
    fn test_validate_tesseract_version() {
        assert!(validate_tesseract_version(5).is_ok());
        assert!(validate_tesseract_version(4).is_ok());
        assert!(matches!(
            validate_tesseract_version(3),
            Err(TextliftError::MissingDependency(_))
        ));
    }
}
