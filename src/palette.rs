//! Dominant-color extraction via k-means clustering.
//!
//! Pixels are stride-sampled from the working buffer and clustered in RGB
//! space for a fixed number of iterations. Centroid initialization is
//! random, so palette order and exact values vary run to run on ambiguous
//! inputs unless the caller pins a seed.

use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// An RGB cluster centroid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorCluster {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorCluster {
    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Creates the clustering RNG: seeded when the caller pins the palette,
/// entropy-backed otherwise.
pub fn palette_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Clusters up to `sample_pixels` stride-sampled pixels into `k` dominant
/// colors.
///
/// Runs k-means for `iterations` fixed rounds: random initial centroids
/// drawn from the sample set, minimum squared-Euclidean assignment, mean
/// update. Empty clusters keep their previous centroid rather than being
/// reseeded, so a cluster can stay stuck on an unlikely initial pixel when
/// the image is near-monochrome. `k == 0` or an empty sample set yields an
/// empty palette; never fails.
pub fn dominant_colors(
    working: &RgbaImage,
    k: usize,
    sample_pixels: usize,
    iterations: usize,
    rng: &mut StdRng,
) -> Vec<ColorCluster> {
    let samples = sample_rgb(working, sample_pixels);
    if k == 0 || samples.is_empty() {
        return Vec::new();
    }

    // Random initial centroids drawn (with replacement) from the samples.
    let mut centroids: Vec<[f32; 3]> = (0..k)
        .map(|_| samples[rng.gen_range(0..samples.len())])
        .collect();

    let mut assignments = vec![0usize; samples.len()];
    for _ in 0..iterations {
        for (i, sample) in samples.iter().enumerate() {
            assignments[i] = nearest_centroid(sample, &centroids);
        }

        let mut sums = vec![[0.0f64; 3]; k];
        let mut counts = vec![0usize; k];
        for (sample, &cluster) in samples.iter().zip(&assignments) {
            counts[cluster] += 1;
            for c in 0..3 {
                sums[cluster][c] += sample[c] as f64;
            }
        }

        for cluster in 0..k {
            if counts[cluster] == 0 {
                continue; // empty cluster: previous centroid stands
            }
            for c in 0..3 {
                centroids[cluster][c] = (sums[cluster][c] / counts[cluster] as f64) as f32;
            }
        }
    }

    debug!(k, samples = samples.len(), "palette clustering done");
    centroids
        .into_iter()
        .map(|c| ColorCluster {
            r: c[0].round().clamp(0.0, 255.0) as u8,
            g: c[1].round().clamp(0.0, 255.0) as u8,
            b: c[2].round().clamp(0.0, 255.0) as u8,
        })
        .collect()
}

/// Uniformly stride-samples up to `limit` pixels across the buffer.
fn sample_rgb(working: &RgbaImage, limit: usize) -> Vec<[f32; 3]> {
    let data = working.as_raw();
    let total = (working.width() as usize) * (working.height() as usize);
    if total == 0 || limit == 0 {
        return Vec::new();
    }
    let stride = (total / limit).max(1);

    let mut samples = Vec::with_capacity(limit.min(total));
    let mut i = 0;
    while i < total && samples.len() < limit {
        let base = i * 4;
        samples.push([
            data[base] as f32,
            data[base + 1] as f32,
            data[base + 2] as f32,
        ]);
        i += stride;
    }
    samples
}

fn nearest_centroid(sample: &[f32; 3], centroids: &[[f32; 3]]) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let dr = sample[0] - centroid[0];
        let dg = sample[1] - centroid[1];
        let db = sample[2] - centroid[2];
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_solid_image_all_centroids_equal_the_color() {
        let img = RgbaImage::from_pixel(64, 64, Rgba([30, 144, 255, 255]));
        let mut rng = palette_rng(Some(7));
        let palette = dominant_colors(&img, 3, 2000, 8, &mut rng);
        assert_eq!(palette.len(), 3);
        for cluster in &palette {
            assert_eq!((cluster.r, cluster.g, cluster.b), (30, 144, 255));
            assert_eq!(cluster.to_hex(), "#1e90ff");
        }
    }

    #[test]
    fn test_zero_k_yields_empty_palette() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([1, 2, 3, 255]));
        let mut rng = palette_rng(Some(7));
        assert!(dominant_colors(&img, 0, 2000, 8, &mut rng).is_empty());
    }

    #[test]
    fn test_two_tone_image_finds_both_colors() {
        let img = RgbaImage::from_fn(64, 64, |x, _| {
            if x < 32 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let mut rng = palette_rng(Some(42));
        let palette = dominant_colors(&img, 2, 2000, 8, &mut rng);
        let mut hexes: Vec<String> = palette.iter().map(|c| c.to_hex()).collect();
        hexes.sort();
        assert_eq!(hexes, vec!["#000000".to_string(), "#ffffff".to_string()]);
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let img = RgbaImage::from_fn(64, 64, |x, y| {
            Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255])
        });
        let mut rng_a = palette_rng(Some(99));
        let mut rng_b = palette_rng(Some(99));
        let a = dominant_colors(&img, 3, 500, 8, &mut rng_a);
        let b = dominant_colors(&img, 3, 500, 8, &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sample_count_bounded() {
        let img = RgbaImage::from_pixel(100, 100, Rgba([9, 9, 9, 255]));
        let samples = sample_rgb(&img, 2000);
        assert!(samples.len() <= 2000);
        assert!(!samples.is_empty());
    }
}
