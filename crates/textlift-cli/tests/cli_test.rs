//! Integration tests for the textlift binary.

use std::io::Cursor;
use std::process::Command;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use tempfile::tempdir;

fn textlift() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_textlift"));
    command.env_remove("RUST_LOG");
    command
}

fn tesseract_available() -> bool {
    Command::new("tesseract")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn english_installed() -> bool {
    Command::new("tesseract")
        .arg("--list-langs")
        .output()
        .map(|out| {
            let listing = format!(
                "{}{}",
                String::from_utf8_lossy(&out.stdout),
                String::from_utf8_lossy(&out.stderr)
            );
            out.status.success() && listing.lines().any(|line| line.trim() == "eng")
        })
        .unwrap_or(false)
}

fn blank_png() -> Vec<u8> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(GrayImage::from_pixel(200, 100, Luma([255])))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_help_lists_subcommands() {
    let output = textlift().arg("--help").output().expect("Failed to run textlift");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("extract"));
    assert!(stdout.contains("batch"));
    assert!(stdout.contains("languages"));
}

#[test]
fn test_missing_tesseract_fails_cleanly() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("scan.png");
    std::fs::write(&image, blank_png()).unwrap();

    let output = textlift()
        .args(["extract", image.to_str().unwrap(), "--tesseract", "/nonexistent/tesseract"])
        .output()
        .expect("Failed to run textlift");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing dependency"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("textlift.toml");
    std::fs::write(&config, "[variants]\nmedian_window = 4\n").unwrap();

    let output = textlift()
        .args(["extract", "scan.png", "--config", config.to_str().unwrap()])
        .output()
        .expect("Failed to run textlift");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("median_window"), "stderr: {}", stderr);
}

#[test]
fn test_corrupted_image_is_unreadable_even_without_tesseract() {
    let dir = tempdir().unwrap();
    let image = dir.path().join("broken.png");
    std::fs::write(&image, b"\x89PNG\r\n\x1a\ngarbage").unwrap();

    let output = textlift()
        .args(["extract", image.to_str().unwrap(), "--tesseract", "/nonexistent/tesseract"])
        .output()
        .expect("Failed to run textlift");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unreadable image"), "stderr: {}", stderr);
}

#[test]
fn test_blank_page_prints_placeholder() {
    if !tesseract_available() {
        eprintln!("Skipping: tesseract not installed");
        return;
    }
    if !english_installed() {
        eprintln!("Skipping: eng traineddata not installed");
        return;
    }

    let dir = tempdir().unwrap();
    let image = dir.path().join("blank.png");
    std::fs::write(&image, blank_png()).unwrap();

    let output = textlift()
        .args(["extract", image.to_str().unwrap(), "--lang", "eng"])
        .output()
        .expect("Failed to run textlift");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "[EMPTY]");
}
