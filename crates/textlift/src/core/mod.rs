//! Core pipeline orchestration, configuration and I/O.
//!
//! - **Extractor** (`extractor`): public entry points, batch and async wrappers
//! - **Pipeline** (`pipeline`): the normalize, variants, score, escalate state machine
//! - **Config** (`config`): file loading and discovery of `textlift.toml`
//! - **IO** (`io`): reading image sources
pub mod config;
pub mod extractor;
pub mod io;
pub mod pipeline;

pub use config::{
    CONFIG_FILE_NAME, EngineSettings, EscalationConfig, ExtractionConfig, NormalizeConfig, OcrSettings,
    VariantConfig,
};
pub use pipeline::{EscalationController, PipelineState};
