//! Pipeline orchestration: runs every stage in dependency order and
//! assembles the [`AnalysisResult`].
//!
//! Stage order: decode → resample → {palette, gradient} → chart heuristic,
//! and resample → regions → digits. Only decoding can fail; every stage
//! after it is total, so a successful decode always produces a full result.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::chart::{self, ProjectionProfile};
use crate::decode::{self, AnalyzeInput, Fetcher, HttpFetcher};
use crate::digits::{DigitReader, DigitReading, SegmentGlyphs};
use crate::error::AnalyzeError;
use crate::gradient;
use crate::options::AnalyzeOptions;
use crate::palette;
use crate::raster;
use crate::regions::{self, MeanThreshold, Region, ThresholdPolicy};

/// Native properties of the decoded input, independent of any scaling.
#[derive(Clone, Debug, Serialize)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub byte_size: usize,
}

/// Everything the pipeline produces for one image.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult {
    /// JPEG-encoded thumbnail (base64 in the JSON form).
    #[serde(serialize_with = "serialize_base64")]
    pub thumbnail: Vec<u8>,
    pub metadata: ImageMetadata,
    /// Dominant colors as `#rrggbb` strings, in final cluster order.
    pub dominant_colors: Vec<String>,
    pub projection: ProjectionProfile,
    pub chart_detected: bool,
    /// Candidate text/number regions in working-buffer coordinates.
    pub regions: Vec<Region>,
    /// One reading per attempted region, including empty ones.
    pub readings: Vec<DigitReading>,
    /// Non-empty digit strings only, for consumers of the compact surface.
    pub digit_sequences: Vec<String>,
    pub summary: String,
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

/// Analyzes an image with the default HTTP fetcher for URL inputs.
pub fn analyze(
    input: &AnalyzeInput,
    options: &AnalyzeOptions,
) -> Result<AnalysisResult, AnalyzeError> {
    analyze_with_fetcher(input, options, &HttpFetcher::new())
}

/// Analyzes an image, resolving URL inputs through the given fetcher.
///
/// A decode failure aborts the run; no partial result is returned. All
/// later stages are total, and degenerate outputs (empty palette, zero
/// regions, no digits) are empty collections.
pub fn analyze_with_fetcher(
    input: &AnalyzeInput,
    options: &AnalyzeOptions,
    fetcher: &dyn Fetcher,
) -> Result<AnalysisResult, AnalyzeError> {
    let decoded = decode::decode_input(input, fetcher)?;
    let metadata = ImageMetadata {
        width: decoded.native_width,
        height: decoded.native_height,
        byte_size: decoded.byte_size,
    };

    let working = raster::working_buffer(&decoded.pixels, options.max_image_area);
    debug!(
        working_w = working.width(),
        working_h = working.height(),
        "working buffer ready"
    );
    let thumbnail = raster::thumbnail(
        &decoded.pixels,
        options.max_thumbnail_width,
        options.thumbnail_quality,
    )?;

    let mut rng = palette::palette_rng(options.palette_seed);
    let dominant_colors: Vec<String> = palette::dominant_colors(
        &working,
        options.k_colors,
        options.sample_pixels,
        options.tunables.kmeans_iterations,
        &mut rng,
    )
    .into_iter()
    .map(|c| c.to_hex())
    .collect();

    let gray = gradient::grayscale(&working);
    let gradient_map = gradient::sobel(&gray);
    let projection = chart::projection_profile(&gradient_map);
    let chart_detected =
        options.detect_charts && chart::is_chart_like(&projection, &options.tunables);

    let regions = if options.detect_text {
        regions::extract_regions(&MeanThreshold.binarize(&gray), &options.tunables)
    } else {
        Vec::new()
    };

    let readings = if options.numeric_ocr && !regions.is_empty() {
        DigitReader::new(&SegmentGlyphs).read_regions(&working, &regions, &options.tunables)
    } else {
        Vec::new()
    };
    let digit_sequences: Vec<String> = readings
        .iter()
        .filter(|r| !r.text.is_empty())
        .map(|r| r.text.clone())
        .collect();

    let summary = summarize(chart_detected, &regions, &dominant_colors, &digit_sequences);
    info!(
        chart_detected,
        region_count = regions.len(),
        digit_count = digit_sequences.len(),
        "analysis complete"
    );

    Ok(AnalysisResult {
        thumbnail,
        metadata,
        dominant_colors,
        projection,
        chart_detected,
        regions,
        readings,
        digit_sequences,
        summary,
    })
}

/// One-line human-readable report: chart verdict, region count, up to 3
/// palette colors, and up to 3 digit samples.
fn summarize(
    chart_detected: bool,
    regions: &[Region],
    colors: &[String],
    digits: &[String],
) -> String {
    let verdict = if chart_detected {
        "chart-like content"
    } else {
        "no chart structure"
    };
    let mut summary = format!("{}; {} candidate text region(s)", verdict, regions.len());

    if !colors.is_empty() {
        let shown: Vec<&str> = colors.iter().take(3).map(String::as_str).collect();
        summary.push_str(&format!("; dominant colors {}", shown.join(", ")));
    }
    if !digits.is_empty() {
        let shown: Vec<&str> = digits.iter().take(3).map(String::as_str).collect();
        summary.push_str(&format!("; digits read: {}", shown.join(", ")));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_input(img: &RgbaImage) -> AnalyzeInput {
        let mut buf = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img.clone())
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        AnalyzeInput::Bytes(buf.into_inner())
    }

    fn seeded_options() -> AnalyzeOptions {
        AnalyzeOptions {
            palette_seed: Some(1234),
            ..AnalyzeOptions::default()
        }
    }

    #[test]
    fn test_solid_image_degenerate_cases() {
        let img = RgbaImage::from_pixel(200, 150, Rgba([90, 90, 90, 255]));
        let result = analyze(&png_input(&img), &seeded_options()).unwrap();

        assert_eq!(result.metadata.width, 200);
        assert_eq!(result.metadata.height, 150);
        assert_eq!(result.dominant_colors, vec!["#5a5a5a"; 3]);
        assert!(!result.chart_detected);
        assert!(result.regions.is_empty());
        assert!(result.readings.is_empty());
        assert!(result.digit_sequences.is_empty());
        assert!(result.summary.contains("0 candidate"));
    }

    #[test]
    fn test_stage_toggles_force_empty_fields() {
        let img = RgbaImage::from_fn(200, 150, |x, y| {
            if x % 40 == 0 || y % 40 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let options = AnalyzeOptions {
            detect_charts: false,
            detect_text: false,
            ..seeded_options()
        };
        let result = analyze(&png_input(&img), &options).unwrap();
        assert!(!result.chart_detected);
        assert!(result.regions.is_empty());
        assert!(result.readings.is_empty());
        // The projection profile is still part of the result.
        assert_eq!(result.projection.row_sums.len(), 150);
    }

    #[test]
    fn test_decode_failure_aborts_without_partial_result() {
        let err = analyze(&AnalyzeInput::Bytes(vec![0, 1, 2, 3]), &seeded_options()).unwrap_err();
        assert!(matches!(err, AnalyzeError::DecodeFailure(_)));
    }

    #[test]
    fn test_summary_mentions_chart_and_colors() {
        let img = RgbaImage::from_fn(400, 300, |x, y| {
            if x % 40 == 0 || y % 40 == 0 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let result = analyze(&png_input(&img), &seeded_options()).unwrap();
        assert!(result.chart_detected);
        assert!(result.summary.contains("chart-like content"));
        assert!(result.summary.contains("#"));
    }
}
