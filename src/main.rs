//! chartsight CLI.
//!
//! Analyzes a screenshot from a file path, remote URL, or inline data URI
//! and prints the one-line summary (or the full result as JSON). Can also
//! dump the thumbnail and a normalized gradient-map rendering for
//! inspection.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use chartsight::{AnalyzeInput, AnalyzeOptions, analyze, gradient, raster};

#[derive(Parser)]
#[command(name = "chartsight", about = "Raster screenshot analysis")]
struct Cli {
    /// Image to analyze: a file path, http(s) URL, or data URI.
    input: String,

    /// Print the full analysis result as JSON instead of the summary line.
    #[arg(long)]
    json: bool,

    /// Pin the color-clustering RNG for reproducible palettes.
    #[arg(long)]
    seed: Option<u64>,

    /// Palette size.
    #[arg(long, default_value_t = 3)]
    colors: usize,

    /// Write the JPEG thumbnail to this path.
    #[arg(long)]
    thumbnail: Option<PathBuf>,

    /// Write a normalized rendering of the gradient map to this path
    /// (diagnostic).
    #[arg(long)]
    gradient_map: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let input = classify_input(&cli.input)?;
    let options = AnalyzeOptions {
        palette_seed: cli.seed,
        k_colors: cli.colors,
        ..AnalyzeOptions::default()
    };

    let result = analyze(&input, &options).context("analysis failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.summary);
        println!(
            "native {}x{} ({} bytes), thumbnail {} bytes",
            result.metadata.width,
            result.metadata.height,
            result.metadata.byte_size,
            result.thumbnail.len()
        );
    }

    if let Some(path) = &cli.thumbnail {
        std::fs::write(path, &result.thumbnail)
            .with_context(|| format!("could not write {}", path.display()))?;
        println!("thumbnail written to {}", path.display());
    }

    if let Some(path) = &cli.gradient_map {
        write_gradient_map(&input, &options, path)?;
        println!("gradient map written to {}", path.display());
    }

    Ok(())
}

/// Treats existing paths as files; everything else must be a URL or data
/// URI.
fn classify_input(text: &str) -> Result<AnalyzeInput> {
    if Path::new(text).exists() {
        return Ok(AnalyzeInput::File(PathBuf::from(text)));
    }
    Ok(AnalyzeInput::from_text(text)?)
}

/// Re-runs the gradient stage on the working buffer and saves the
/// normalized rendering. Diagnostic only, so the extra decode is fine.
fn write_gradient_map(input: &AnalyzeInput, options: &AnalyzeOptions, path: &Path) -> Result<()> {
    let decoded = chartsight::decode::decode_input(input, &chartsight::HttpFetcher::new())?;
    let working = raster::working_buffer(&decoded.pixels, options.max_image_area);
    let map = gradient::sobel(&gradient::grayscale(&working));
    gradient::render_gradient_map(&map)
        .save(path)
        .with_context(|| format!("could not write {}", path.display()))?;
    Ok(())
}
