//! Character-class quality heuristic for ranking OCR output.
//!
//! Score for non-empty text:
//!
//! ```text
//! score = alnum + DENSITY_WEIGHT * (alnum / total) - WEIRD_PENALTY * weird
//! ```
//!
//! where `weird` counts characters that are neither alphanumeric nor
//! whitespace and `total` counts every character. Empty text scores negative
//! infinity. The score strictly increases with `alnum` at fixed `weird` and
//! strictly decreases with `weird` at fixed `alnum`.

const DENSITY_WEIGHT: f64 = 40.0;
const WEIRD_PENALTY: f64 = 3.0;

/// Per-class character counts of a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharClassCounts {
    pub alnum: usize,
    pub whitespace: usize,
    pub weird: usize,
    pub total: usize,
}

impl CharClassCounts {
    pub fn of(text: &str) -> Self {
        text.chars().fold(Self::default(), |mut counts, c| {
            counts.total += 1;
            if c.is_alphanumeric() {
                counts.alnum += 1;
            } else if c.is_whitespace() {
                counts.whitespace += 1;
            } else {
                counts.weird += 1;
            }
            counts
        })
    }

    /// Fraction of characters that are alphanumeric; 0.0 for empty text.
    pub fn density(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.alnum as f64 / self.total as f64
        }
    }
}

/// Fitness of an OCR transcription; higher is better.
pub fn score_text(text: &str) -> f64 {
    if text.is_empty() {
        return f64::NEG_INFINITY;
    }

    let counts = CharClassCounts::of(text);
    counts.alnum as f64 + DENSITY_WEIGHT * counts.density() - WEIRD_PENALTY * counts.weird as f64
}

/// Raw OCR text paired with its score.
///
/// The score is negative infinity exactly when the text is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredText {
    text: String,
    score: f64,
}

impl ScoredText {
    pub fn new(text: String) -> Self {
        let score = score_text(&text);
        Self { text, score }
    }

    /// The no-text candidate every real candidate outranks.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            score: f64::NEG_INFINITY,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Finite score, or `None` for empty text.
    pub fn finite_score(&self) -> Option<f64> {
        self.score.is_finite().then_some(self.score)
    }

    /// Strictly better than `other`. Ties favor whichever was seen first.
    pub fn beats(&self, other: &ScoredText) -> bool {
        self.score > other.score
    }
}

impl From<String> for ScoredText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for ScoredText {
    fn from(text: &str) -> Self {
        Self::new(text.to_string())
    }
}
