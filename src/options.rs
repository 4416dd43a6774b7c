//! Analysis options and tunable constants.
//!
//! All thresholds that the algorithms depend on live either here or in
//! [`Tunables`], so they can be adjusted (and pinned in tests) without
//! touching the stage implementations. Loadable from JSON; every field
//! has a default so a partial config is valid.

use serde::{Deserialize, Serialize};

/// Options for a single `analyze` invocation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalyzeOptions {
    /// Maximum thumbnail width in pixels; height follows the aspect ratio.
    #[serde(default = "default_max_thumbnail_width")]
    pub max_thumbnail_width: u32,
    /// JPEG quality for the thumbnail, 0.0–1.0.
    #[serde(default = "default_thumbnail_quality")]
    pub thumbnail_quality: f32,
    /// Maximum number of pixels sampled for color clustering.
    #[serde(default = "default_sample_pixels")]
    pub sample_pixels: usize,
    /// Palette size (k in k-means).
    #[serde(default = "default_k_colors")]
    pub k_colors: usize,
    /// Run the chart heuristic. When false, `chart_detected` is always false.
    #[serde(default = "default_true")]
    pub detect_charts: bool,
    /// Extract candidate text/number regions. When false, the region list
    /// is empty (and no digit reading is attempted).
    #[serde(default = "default_true")]
    pub detect_text: bool,
    /// Attempt digit reading on the extracted regions.
    #[serde(default = "default_true")]
    pub numeric_ocr: bool,
    /// Safety cap on the pixel area processed; larger images are uniformly
    /// pre-scaled by `sqrt(cap / area)` before the working-buffer cap.
    #[serde(default = "default_max_image_area")]
    pub max_image_area: u64,
    /// Seed for the color-clustering RNG. `None` uses entropy; tests pass
    /// `Some(seed)` to make the palette reproducible.
    #[serde(default)]
    pub palette_seed: Option<u64>,
    /// Algorithm constants, tunable independently of the per-call options.
    #[serde(default)]
    pub tunables: Tunables,
}

fn default_max_thumbnail_width() -> u32 {
    800
}

fn default_thumbnail_quality() -> f32 {
    0.85
}

fn default_sample_pixels() -> usize {
    2000
}

fn default_k_colors() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_max_image_area() -> u64 {
    16_000_000
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_thumbnail_width: default_max_thumbnail_width(),
            thumbnail_quality: default_thumbnail_quality(),
            sample_pixels: default_sample_pixels(),
            k_colors: default_k_colors(),
            detect_charts: true,
            detect_text: true,
            numeric_ocr: true,
            max_image_area: default_max_image_area(),
            palette_seed: None,
            tunables: Tunables::default(),
        }
    }
}

/// Empirical constants used by the analysis stages.
///
/// These are tuned values, not derived ones. They are hoisted here so the
/// stages stay free of inline magic numbers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tunables {
    /// Fixed number of k-means iterations.
    #[serde(default = "default_kmeans_iterations")]
    pub kmeans_iterations: usize,
    /// A row/column is a peak when its gradient sum exceeds this multiple
    /// of the mean.
    #[serde(default = "default_chart_peak_multiplier")]
    pub chart_peak_multiplier: f32,
    /// Minimum peak count on either axis before the 1%-of-dimension floor
    /// takes over.
    #[serde(default = "default_chart_peak_floor")]
    pub chart_peak_floor: usize,
    /// Components with a bounding-box area at or below this are discarded.
    #[serde(default = "default_min_region_box_area")]
    pub min_region_box_area: u32,
    /// Components whose bounding-box height reaches this fraction of the
    /// image height are discarded (borders, vertical dividers).
    #[serde(default = "default_max_region_height_frac")]
    pub max_region_height_frac: f32,
    /// Hard cap on the number of regions retained per invocation.
    #[serde(default = "default_max_regions")]
    pub max_regions: usize,
    /// Digit reading is attempted on at most this many regions.
    #[serde(default = "default_ocr_region_cap")]
    pub ocr_region_cap: usize,
    /// A template match is accepted when its mismatched-pixel count is
    /// strictly below this.
    #[serde(default = "default_ocr_match_threshold")]
    pub ocr_match_threshold: u32,
    /// Sliding-window step in pixels.
    #[serde(default = "default_ocr_window_step")]
    pub ocr_window_step: u32,
    /// Accepted matches closer than this fraction of the template width to
    /// the previous accepted x-position are dropped as duplicates.
    #[serde(default = "default_ocr_dedup_frac")]
    pub ocr_dedup_frac: f32,
}

fn default_kmeans_iterations() -> usize {
    8
}

fn default_chart_peak_multiplier() -> f32 {
    3.0
}

fn default_chart_peak_floor() -> usize {
    2
}

fn default_min_region_box_area() -> u32 {
    30
}

fn default_max_region_height_frac() -> f32 {
    0.8
}

fn default_max_regions() -> usize {
    256
}

fn default_ocr_region_cap() -> usize {
    6
}

fn default_ocr_match_threshold() -> u32 {
    192
}

fn default_ocr_window_step() -> u32 {
    16
}

fn default_ocr_dedup_frac() -> f32 {
    0.8
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            kmeans_iterations: default_kmeans_iterations(),
            chart_peak_multiplier: default_chart_peak_multiplier(),
            chart_peak_floor: default_chart_peak_floor(),
            min_region_box_area: default_min_region_box_area(),
            max_region_height_frac: default_max_region_height_frac(),
            max_regions: default_max_regions(),
            ocr_region_cap: default_ocr_region_cap(),
            ocr_match_threshold: default_ocr_match_threshold(),
            ocr_window_step: default_ocr_window_step(),
            ocr_dedup_frac: default_ocr_dedup_frac(),
        }
    }
}
