//! Shared mock engines and fixture builders for integration tests.
#![allow(dead_code)]

use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use textlift::image::RasterImage;
use textlift::ocr::{OcrConfig, OcrEngine};
use textlift::{Result, TextliftError};

/// Returns the same text for every call and records what it was shown.
pub struct RecordingEngine {
    pub text: String,
    pub calls: AtomicUsize,
    pub dimensions: Mutex<Vec<(u32, u32)>>,
    pub languages: Mutex<Vec<String>>,
}

impl RecordingEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: AtomicUsize::new(0),
            dimensions: Mutex::new(Vec::new()),
            languages: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_dimensions(&self) -> Vec<(u32, u32)> {
        self.dimensions.lock().unwrap().clone()
    }
}

impl OcrEngine for RecordingEngine {
    fn name(&self) -> &str {
        "recording"
    }

    fn recognize(&self, image: &RasterImage, config: &OcrConfig) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.dimensions.lock().unwrap().push(image.dimensions());
        self.languages.lock().unwrap().push(config.language.clone());
        Ok(self.text.clone())
    }
}

/// Replies in call order; runs out into empty strings.
pub struct ScriptedEngine {
    replies: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().rev().map(|s| s.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OcrEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn recognize(&self, _image: &RasterImage, _config: &OcrConfig) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.replies.lock().unwrap().pop().unwrap_or_default())
    }
}

/// Text derived from pixel content only, so the output is independent of call order.
///
/// Every dark pixel contributes a letter and every mid-gray pixel a `~`.
pub struct PixelEngine;

impl OcrEngine for PixelEngine {
    fn name(&self) -> &str {
        "pixel"
    }

    fn recognize(&self, image: &RasterImage, _config: &OcrConfig) -> Result<String> {
        let mut text = String::new();
        for pixel in image.as_gray().pixels() {
            match pixel.0[0] {
                0..=63 => text.push('x'),
                64..=191 => text.push('~'),
                _ => {}
            }
        }
        Ok(text)
    }
}

/// Fails on every call.
pub struct FailingEngine {
    pub calls: AtomicUsize,
}

impl FailingEngine {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl OcrEngine for FailingEngine {
    fn name(&self) -> &str {
        "failing"
    }

    fn recognize(&self, _image: &RasterImage, _config: &OcrConfig) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(TextliftError::engine_failure("engine crashed"))
    }
}

/// Sleeps before answering.
pub struct SlowEngine {
    pub delay: Duration,
}

impl OcrEngine for SlowEngine {
    fn name(&self) -> &str {
        "slow"
    }

    fn recognize(&self, _image: &RasterImage, _config: &OcrConfig) -> Result<String> {
        std::thread::sleep(self.delay);
        Ok("SLOW BUT STEADY".to_string())
    }
}

/// PNG bytes of a uniform gray image.
pub fn uniform_png(width: u32, height: u32, level: u8) -> Vec<u8> {
    encode_png(GrayImage::from_pixel(width, height, Luma([level])))
}

/// PNG bytes of a white page with a dark block in the middle.
pub fn page_with_block_png(width: u32, height: u32) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, y| {
        let inside = x >= width / 4 && x < 3 * width / 4 && y >= height / 4 && y < 3 * height / 4;
        if inside { Luma([20]) } else { Luma([240]) }
    });
    encode_png(img)
}

pub fn encode_png(img: GrayImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("PNG encoding of an in-memory image succeeds");
    bytes
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("fixture is writable");
    path
}
