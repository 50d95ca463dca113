//! Final cleanup of the winning transcription.
//!
//! Newlines are kept: downstream renderers lay the text out line by line.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tesseract terminates each page with a form feed.
pub const PAGE_BREAK: char = '\u{000C}';

static HORIZONTAL_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+").expect("Horizontal whitespace regex pattern is valid and should compile"));

fn is_stray_control(c: char) -> bool {
    c == PAGE_BREAK || (c.is_ascii_control() && !matches!(c, '\n' | '\r' | '\t'))
}

/// Remove page breaks and other control characters, keeping newlines, carriage returns and tabs.
pub fn strip_control_characters(text: &str) -> String {
    if text.chars().any(is_stray_control) {
        text.chars().filter(|&c| !is_stray_control(c)).collect()
    } else {
        text.to_string()
    }
}

/// Strip control artifacts, trim the ends and collapse runs of spaces and tabs.
///
/// Idempotent: `clean_text(&clean_text(s)) == clean_text(s)`.
pub fn clean_text(text: &str) -> String {
    let stripped = strip_control_characters(text);
    HORIZONTAL_WHITESPACE.replace_all(stripped.trim(), " ").into_owned()
}
