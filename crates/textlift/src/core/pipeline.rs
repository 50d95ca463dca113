//! Hybrid OCR decision pipeline.
//!
//! The controller runs a small state machine per image:
//!
//! 1. `Normalized` - the source is decoded, grayscaled and capped at `max_side`
//! 2. `VariantsScored` - every (variant, pass) pair is recognized and scored
//! 3. `Escalating` - only when the best score is below the quality threshold:
//!    the normalized image is upscaled and recognized once more
//! 4. `Done` - the winning text is sanitized and returned
//!
//! Candidates are folded into a running maximum in evaluation order. A later
//! candidate replaces the incumbent only with a strictly higher score, so ties
//! keep the earlier variant and the upscaled retry cannot displace an equal
//! first-pass winner.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::core::config::ExtractionConfig;
use crate::image::{RasterImage, Variant, VariantKind, generate_variants, load_and_normalize, upscale};
use crate::ocr::{OcrConfig, OcrEngine, OcrPass};
use crate::text::{ScoredText, clean_text};
use crate::types::{AttemptRecord, ExtractionResult, ImageSource};

/// Stages of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Normalized,
    VariantsScored,
    Escalating,
    Done,
}

/// One recognized candidate before it joins the running maximum.
struct Candidate {
    variant: VariantKind,
    pass: OcrPass,
    scored: ScoredText,
}

impl Candidate {
    fn record(&self) -> AttemptRecord {
        AttemptRecord {
            variant: self.variant,
            pass: self.pass,
            score: self.scored.finite_score(),
            char_count: self.scored.text().chars().count(),
        }
    }
}

/// Running maximum over candidates.
struct Best {
    scored: ScoredText,
    variant: Option<VariantKind>,
    pass: Option<OcrPass>,
}

impl Best {
    fn none() -> Self {
        Self {
            scored: ScoredText::empty(),
            variant: None,
            pass: None,
        }
    }

    fn offer(self, candidate: Candidate) -> Self {
        if candidate.scored.beats(&self.scored) {
            Self {
                scored: candidate.scored,
                variant: Some(candidate.variant),
                pass: Some(candidate.pass),
            }
        } else {
            self
        }
    }
}

/// Drives one image through normalization, variant scoring and the optional upscaled retry.
///
/// The controller owns its configuration and engine and holds no per-run
/// state, so one instance can serve many images (including concurrently when
/// `E` is shared across threads).
///
/// # Example
///
/// ```rust
/// use textlift::core::config::ExtractionConfig;
/// use textlift::core::pipeline::EscalationController;
/// use textlift::image::RasterImage;
/// use textlift::ocr::{OcrConfig, OcrEngine};
///
/// struct Echo;
///
/// impl OcrEngine for Echo {
///     fn name(&self) -> &str {
///         "echo"
///     }
///
///     fn recognize(&self, _image: &RasterImage, _config: &OcrConfig) -> textlift::Result<String> {
///         Ok("HELLO WORLD".to_string())
///     }
/// }
///
/// # fn main() -> textlift::Result<()> {
/// let controller = EscalationController::new(Echo, ExtractionConfig::default())?;
/// let page = RasterImage::from_fn(800, 600, |_, _| image::Luma([255]));
/// let result = controller.run_normalized(&page, "page")?;
/// assert_eq!(result.content, "HELLO WORLD");
/// assert!(!result.escalated);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct EscalationController<E> {
    engine: E,
    config: ExtractionConfig,
}

impl<E: OcrEngine> EscalationController<E> {
    /// Build a controller after validating `config`.
    ///
    /// # Errors
    ///
    /// `TextliftError::Validation` if any configuration value is out of range.
    pub fn new(engine: E, config: ExtractionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Read, normalize and recognize `source`.
    ///
    /// Decoding happens before any OCR call, so an undecodable source fails
    /// with `UnreadableImage` without touching the engine.
    pub fn run(&self, source: &ImageSource) -> Result<ExtractionResult> {
        let label = source.label();
        let normalized = load_and_normalize(source, self.config.normalize.max_side)?;
        self.run_normalized(&normalized, &label)
    }

    /// Run the pipeline on an image that is already normalized.
    ///
    /// `label` identifies the image in logs, error messages and the result.
    pub fn run_normalized(&self, normalized: &RasterImage, label: &str) -> Result<ExtractionResult> {
        let mut stages = vec![PipelineState::Normalized];
        let configs = self.ocr_configs();
        let mut attempts = Vec::new();

        let variants = generate_variants(normalized, &self.config.variants);
        let mut best = self.evaluate(&variants, &configs, label, Best::none(), &mut attempts)?;
        drop(variants);
        stages.push(PipelineState::VariantsScored);

        tracing::debug!(
            "{}: best first-pass score {} from {:?}",
            label,
            best.scored.score(),
            best.variant
        );

        let escalation = &self.config.escalation;
        let mut escalated = false;
        if escalation.enabled && best.scored.score() < escalation.quality_threshold {
            stages.push(PipelineState::Escalating);
            escalated = true;
            tracing::info!(
                "{}: score {} below threshold {}, retrying at {}x",
                label,
                best.scored.score(),
                escalation.quality_threshold,
                escalation.upscale_factor
            );

            let upscaled = [Variant::new(
                VariantKind::Upscaled,
                upscale(normalized, escalation.upscale_factor),
            )];
            best = self.evaluate(&upscaled, &configs, label, best, &mut attempts)?;

            if best.variant != Some(VariantKind::Upscaled) {
                tracing::warn!("{}: upscaled retry did not improve the result", label);
            }
        }

        stages.push(PipelineState::Done);

        match best.variant {
            Some(variant) => tracing::info!("{}: kept {} variant, score {}", label, variant, best.scored.score()),
            None => tracing::info!("{}: no text recognized in any variant", label),
        }

        let score = best.scored.finite_score();
        let raw_content = best.scored.into_text();
        let content = clean_text(&raw_content);

        Ok(ExtractionResult {
            content,
            raw_content,
            score,
            winner: best.variant,
            winning_pass: best.pass,
            escalated,
            attempts,
            stages,
            source: label.to_string(),
        })
    }

    fn ocr_configs(&self) -> Vec<OcrConfig> {
        self.config
            .ocr
            .passes
            .iter()
            .map(|pass| OcrConfig::new(*pass, self.config.ocr.language.as_str()))
            .collect()
    }

    /// Recognize every (variant, pass) pair and fold the results into `best`.
    ///
    /// Parallel evaluation collects in input order before folding, so the
    /// winner matches a sequential run.
    fn evaluate(
        &self,
        variants: &[Variant],
        configs: &[OcrConfig],
        label: &str,
        best: Best,
        attempts: &mut Vec<AttemptRecord>,
    ) -> Result<Best> {
        let jobs: Vec<(&Variant, &OcrConfig)> = variants
            .iter()
            .flat_map(|variant| configs.iter().map(move |config| (variant, config)))
            .collect();

        let candidates: Vec<Candidate> = if self.config.parallel_variants && jobs.len() > 1 {
            jobs.par_iter()
                .map(|&(variant, config)| self.attempt(variant, config, label))
                .collect::<Result<Vec<_>>>()?
        } else {
            jobs.iter()
                .map(|&(variant, config)| self.attempt(variant, config, label))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(candidates.into_iter().fold(best, |best, candidate| {
            attempts.push(candidate.record());
            best.offer(candidate)
        }))
    }

    fn attempt(&self, variant: &Variant, config: &OcrConfig, label: &str) -> Result<Candidate> {
        let pass = config.pass();
        let raw = self
            .engine
            .recognize(&variant.image, config)
            .map_err(|e| e.with_context(&format!("{} ({} variant, {})", label, variant.kind, pass)))?;

        let scored = ScoredText::new(raw);
        tracing::debug!(
            "{}: {} {} variant ({}) scored {} over {} chars",
            label,
            self.engine.name(),
            variant.kind,
            pass,
            scored.score(),
            scored.text().chars().count()
        );

        Ok(Candidate {
            variant: variant.kind,
            pass,
            scored,
        })
    }
}
