use serde::{Deserialize, Serialize};
use std::fmt;

/// Page Segmentation Mode for Tesseract OCR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum PageSegMode {
    OsdOnly = 0,
    AutoOsd = 1,
    AutoOnly = 2,
    Auto = 3,
    SingleColumn = 4,
    SingleBlockVertical = 5,
    SingleBlock = 6,
    SingleLine = 7,
    SingleWord = 8,
    CircleWord = 9,
    SingleChar = 10,
    SparseText = 11,
    SparseTextOsd = 12,
    RawLine = 13,
}

impl PageSegMode {
    pub fn from_u8(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(PageSegMode::OsdOnly),
            1 => Ok(PageSegMode::AutoOsd),
            2 => Ok(PageSegMode::AutoOnly),
            3 => Ok(PageSegMode::Auto),
            4 => Ok(PageSegMode::SingleColumn),
            5 => Ok(PageSegMode::SingleBlockVertical),
            6 => Ok(PageSegMode::SingleBlock),
            7 => Ok(PageSegMode::SingleLine),
            8 => Ok(PageSegMode::SingleWord),
            9 => Ok(PageSegMode::CircleWord),
            10 => Ok(PageSegMode::SingleChar),
            11 => Ok(PageSegMode::SparseText),
            12 => Ok(PageSegMode::SparseTextOsd),
            13 => Ok(PageSegMode::RawLine),
            _ => Err(format!("Invalid PSM mode value: {}", value)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for PageSegMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

impl From<PageSegMode> for u8 {
    fn from(mode: PageSegMode) -> Self {
        mode.as_u8()
    }
}

/// OCR Engine Mode for Tesseract OCR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EngineMode {
    LegacyOnly = 0,
    LstmOnly = 1,
    LegacyAndLstm = 2,
    /// Whatever the installed engine considers best (LSTM on current builds).
    Default = 3,
}

impl EngineMode {
    pub fn from_u8(value: u8) -> Result<Self, String> {
        match value {
            0 => Ok(EngineMode::LegacyOnly),
            1 => Ok(EngineMode::LstmOnly),
            2 => Ok(EngineMode::LegacyAndLstm),
            3 => Ok(EngineMode::Default),
            _ => Err(format!("Invalid OEM value: {}", value)),
        }
    }

    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for EngineMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

impl From<EngineMode> for u8 {
    fn from(mode: EngineMode) -> Self {
        mode.as_u8()
    }
}

/// One engine configuration tried against every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OcrPass {
    pub engine_mode: EngineMode,
    pub psm: PageSegMode,
}

impl Default for OcrPass {
    fn default() -> Self {
        Self {
            engine_mode: EngineMode::Default,
            psm: PageSegMode::SingleBlock,
        }
    }
}

impl fmt::Display for OcrPass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oem={} psm={}", self.engine_mode.as_u8(), self.psm.as_u8())
    }
}

/// Immutable engine configuration for a single recognize call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OcrConfig {
    pub engine_mode: EngineMode,
    pub psm: PageSegMode,
    pub language: String,
}

impl OcrConfig {
    pub fn new(pass: OcrPass, language: impl Into<String>) -> Self {
        Self {
            engine_mode: pass.engine_mode,
            psm: pass.psm,
            language: language.into(),
        }
    }

    pub fn pass(&self) -> OcrPass {
        OcrPass {
            engine_mode: self.engine_mode,
            psm: self.psm,
        }
    }

    /// Command-line arguments selecting this configuration.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--oem".to_string(),
            self.engine_mode.as_u8().to_string(),
            "--psm".to_string(),
            self.psm.as_u8().to_string(),
            "-l".to_string(),
            self.language.clone(),
        ]
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::new(OcrPass::default(), "eng")
    }
}
