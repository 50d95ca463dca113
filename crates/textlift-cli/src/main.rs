//! textlift command-line interface.
//!
//! ```text
//! textlift extract scan.png --lang deu
//! textlift extract scan.png --format json --output scan.json
//! textlift batch page1.png page2.jpg page3.tiff
//! textlift languages
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use textlift::image::load_and_normalize;
use textlift::{
    BatchItemResult, EscalationController, ExtractionConfig, ExtractionResult, ImageSource, TesseractEngine,
};
use tracing_subscriber::EnvFilter;

/// Placeholder written when no text was recognized.
const EMPTY_PLACEHOLDER: &str = "[EMPTY]";

#[derive(Parser)]
#[command(name = "textlift")]
#[command(version, about = "Hybrid OCR: preprocess, recognize, score and keep the best transcription")]
struct Cli {
    /// Log pipeline decisions to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract text from a single image
    Extract {
        /// Image file to read
        image: PathBuf,

        #[command(flatten)]
        options: SharedOptions,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract text from several images in parallel
    Batch {
        /// Image files to read
        #[arg(required = true)]
        images: Vec<PathBuf>,

        #[command(flatten)]
        options: SharedOptions,
    },

    /// List the OCR languages installed for tesseract
    Languages {
        /// Path to the tesseract binary
        #[arg(long)]
        tesseract: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct SharedOptions {
    /// OCR language code (e.g. eng, deu, eng+fra)
    #[arg(short, long)]
    lang: Option<String>,

    /// Configuration file (TOML or JSON). Defaults to a discovered textlift.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the tesseract binary
    #[arg(long)]
    tesseract: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract { image, options, output } => {
            let config = load_config(&options)?;
            let result = extract_image(&image, config)
                .with_context(|| format!("Failed to extract text from {}", image.display()))?;

            let rendered = render_result(&result, options.format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write output file {}", path.display()))?;
                    tracing::info!("Wrote {}", path.display());
                }
                None => println!("{}", rendered),
            }
        }
        Commands::Batch { images, options } => {
            let config = load_config(&options)?;
            let engine = TesseractEngine::new(&config.engine)?;
            let results = textlift::batch_extract_file_sync(images.as_slice(), &config, &engine)?;

            println!("{}", render_batch(&results, options.format)?);

            let failed = results.iter().filter(|item| !item.success).count();
            if failed > 0 {
                bail!("{} of {} images failed", failed, results.len());
            }
        }
        Commands::Languages { tesseract } => {
            let mut config = ExtractionConfig::default();
            config.engine.tesseract_path = tesseract;
            let engine = TesseractEngine::new(&config.engine)?;
            for language in engine.available_languages()? {
                println!("{}", language);
            }
        }
    }

    Ok(())
}

/// Decodes and normalizes the image before tesseract is probed.
fn extract_image(image: &Path, config: ExtractionConfig) -> textlift::Result<ExtractionResult> {
    let source = ImageSource::Path(image.to_path_buf());
    let normalized = load_and_normalize(&source, config.normalize.max_side)?;
    let engine = TesseractEngine::new(&config.engine)?;
    EscalationController::new(engine, config)?.run_normalized(&normalized, &source.label())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "textlift=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Explicit `--config`, then a discovered `textlift.toml`, then defaults; CLI flags override.
fn load_config(options: &SharedOptions) -> Result<ExtractionConfig> {
    let mut config = match &options.config {
        Some(path) => load_config_file(path)?,
        None => ExtractionConfig::discover()?.unwrap_or_default(),
    };

    if let Some(lang) = &options.lang {
        config = config.with_language(lang.clone());
    }
    if let Some(tesseract) = &options.tesseract {
        config.engine.tesseract_path = Some(tesseract.clone());
    }

    config.validate()?;
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<ExtractionConfig> {
    ExtractionConfig::from_file(path).with_context(|| format!("Failed to load config {}", path.display()))
}

fn display_content(content: &str) -> &str {
    if content.is_empty() { EMPTY_PLACEHOLDER } else { content }
}

fn render_result(result: &ExtractionResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(display_content(&result.content).to_string()),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

fn render_batch(results: &[BatchItemResult], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        OutputFormat::Text => {
            let sections: Vec<String> = results
                .iter()
                .map(|item| {
                    let body = match (&item.result, &item.error) {
                        (Some(result), _) => display_content(&result.content).to_string(),
                        (None, Some(error)) => format!("error: {}", error),
                        (None, None) => EMPTY_PLACEHOLDER.to_string(),
                    };
                    format!("==> {} <==\n{}", item.file_path, body)
                })
                .collect();
            Ok(sections.join("\n\n"))
        }
    }
}
