//! Binarization and connected-component region extraction.
//!
//! Foreground pixels (darker than the global mean) are grouped into
//! 4-connected components; each surviving component becomes a candidate
//! text/number region with its bounding box and foreground pixel count.

use image::GrayImage;
use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

use crate::options::Tunables;

/// One bit per pixel; true = foreground.
#[derive(Clone, Debug)]
pub struct BinaryMask {
    pub width: u32,
    pub height: u32,
    pub mask: Vec<bool>,
}

/// Pluggable binarization policy.
///
/// The default [`MeanThreshold`] assumes dark markings on a lighter
/// background and will misbehave on dark-themed screenshots; a smarter
/// policy (Otsu, adaptive) can be substituted without touching the
/// labeling logic.
pub trait ThresholdPolicy {
    fn binarize(&self, gray: &GrayImage) -> BinaryMask;
}

/// Marks pixels strictly darker than the global mean intensity as
/// foreground. On a solid image the mean equals every pixel, so nothing
/// is foreground.
pub struct MeanThreshold;

impl ThresholdPolicy for MeanThreshold {
    fn binarize(&self, gray: &GrayImage) -> BinaryMask {
        let data = gray.as_raw();
        let total: u64 = data.iter().map(|&v| v as u64).sum();
        let mean = if data.is_empty() {
            0.0
        } else {
            total as f64 / data.len() as f64
        };
        BinaryMask {
            width: gray.width(),
            height: gray.height(),
            mask: data.iter().map(|&v| (v as f64) < mean).collect(),
        }
    }
}

/// A candidate text/shape region in working-buffer coordinates.
#[derive(Clone, Debug, Serialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Count of foreground pixels inside the box (not the box area).
    pub pixel_area: u32,
    pub aspect_ratio: f32,
}

/// Labels 4-connected foreground components and returns the filtered
/// region list in discovery order (raster order of each component's first
/// foreground pixel).
///
/// Filters: bounding-box area must exceed `min_region_box_area`, and the
/// box height must stay below `max_region_height_frac` of the image height
/// (full-height artifacts such as borders and dividers are not text). At
/// most `max_regions` regions are retained. Total function.
pub fn extract_regions(mask: &BinaryMask, tunables: &Tunables) -> Vec<Region> {
    let w = mask.width as usize;
    let h = mask.height as usize;
    let mut visited = vec![false; w * h];
    let mut regions = Vec::new();
    // One queue reused across components keeps the BFS allocation bounded
    // by the largest single component.
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    let max_height = (mask.height as f32 * tunables.max_region_height_frac) as u32;

    for start_y in 0..h {
        for start_x in 0..w {
            let start_idx = start_y * w + start_x;
            if !mask.mask[start_idx] || visited[start_idx] {
                continue;
            }

            visited[start_idx] = true;
            queue.push_back((start_x, start_y));

            let (mut min_x, mut max_x) = (start_x, start_x);
            let (mut min_y, mut max_y) = (start_y, start_y);
            let mut pixel_area: u32 = 0;

            while let Some((x, y)) = queue.pop_front() {
                pixel_area += 1;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);

                // 4-neighbor adjacency only; diagonals do not connect.
                if x > 0 {
                    push_unvisited(mask, &mut visited, &mut queue, x - 1, y, w);
                }
                if x + 1 < w {
                    push_unvisited(mask, &mut visited, &mut queue, x + 1, y, w);
                }
                if y > 0 {
                    push_unvisited(mask, &mut visited, &mut queue, x, y - 1, w);
                }
                if y + 1 < h {
                    push_unvisited(mask, &mut visited, &mut queue, x, y + 1, w);
                }
            }

            let width = (max_x - min_x + 1) as u32;
            let height = (max_y - min_y + 1) as u32;
            if width * height <= tunables.min_region_box_area || height >= max_height.max(1) {
                continue;
            }

            regions.push(Region {
                x: min_x as u32,
                y: min_y as u32,
                width,
                height,
                pixel_area,
                aspect_ratio: width as f32 / height as f32,
            });
            if regions.len() >= tunables.max_regions {
                debug!(max = tunables.max_regions, "region cap reached");
                return regions;
            }
        }
    }

    regions
}

fn push_unvisited(
    mask: &BinaryMask,
    visited: &mut [bool],
    queue: &mut VecDeque<(usize, usize)>,
    x: usize,
    y: usize,
    w: usize,
) {
    let idx = y * w + x;
    if mask.mask[idx] && !visited[idx] {
        visited[idx] = true;
        queue.push_back((x, y));
    }
}
