//! Projection profiles and the chart-likeness heuristic.
//!
//! Chart gridlines and axes produce sharp, sparse high-gradient rows and
//! columns; photographic or textual content spreads its gradient energy
//! much more evenly. Counting rows/columns whose gradient sum far exceeds
//! the mean separates the two surprisingly well for screenshots.

use serde::Serialize;

use crate::gradient::GradientMap;
use crate::options::Tunables;

/// 1-D summaries of a gradient map: the sum of magnitudes along each row
/// and each column. The two totals are equal by construction.
#[derive(Clone, Debug, Serialize)]
pub struct ProjectionProfile {
    pub row_sums: Vec<f32>,
    pub col_sums: Vec<f32>,
}

/// Computes the row/column projection profile of a gradient map.
pub fn projection_profile(map: &GradientMap) -> ProjectionProfile {
    let w = map.width as usize;
    let h = map.height as usize;
    let mut row_sums = vec![0.0f32; h];
    let mut col_sums = vec![0.0f32; w];

    for y in 0..h {
        for x in 0..w {
            let mag = map.magnitudes[y * w + x];
            row_sums[y] += mag;
            col_sums[x] += mag;
        }
    }

    ProjectionProfile { row_sums, col_sums }
}

/// Decides whether the profile looks chart-like.
///
/// A row is a peak when its sum exceeds `chart_peak_multiplier` times the
/// row mean (columns likewise). The verdict is positive when either axis
/// has more than `max(chart_peak_floor, 1% of its length)` peaks. The
/// multiplier and floor are empirically chosen, tunable constants.
pub fn is_chart_like(profile: &ProjectionProfile, tunables: &Tunables) -> bool {
    let peak_rows = count_peaks(&profile.row_sums, tunables.chart_peak_multiplier);
    let peak_cols = count_peaks(&profile.col_sums, tunables.chart_peak_multiplier);

    let row_floor = (profile.row_sums.len() / 100).max(tunables.chart_peak_floor);
    let col_floor = (profile.col_sums.len() / 100).max(tunables.chart_peak_floor);

    peak_rows > row_floor || peak_cols > col_floor
}

fn count_peaks(sums: &[f32], multiplier: f32) -> usize {
    if sums.is_empty() {
        return 0;
    }
    let mean = sums.iter().sum::<f32>() / sums.len() as f32;
    let threshold = multiplier * mean;
    sums.iter().filter(|&&s| s > threshold).count()
}
