//! Text scoring and sanitizing.
pub mod quality;
pub mod sanitize;

pub use quality::{CharClassCounts, ScoredText, score_text};
pub use sanitize::{PAGE_BREAK, clean_text, strip_control_characters};
