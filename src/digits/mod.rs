//! Best-effort digit reading via sliding-window template matching.
//!
//! Each candidate region is cropped from the working buffer, binarized,
//! and scanned with a 32x32 window; every position is scored against the
//! ten digit templates by mismatched-pixel count. This is explicitly not
//! an OCR engine: absence of a match is a low-confidence result, never an
//! error.

pub mod glyphs;

pub use glyphs::{GlyphRasterizer, SegmentGlyphs};

use image::imageops::{self, FilterType};
use image::RgbaImage;
use serde::Serialize;
use tracing::debug;

use crate::gradient;
use crate::options::Tunables;
use crate::regions::Region;

/// Template edge length in pixels.
pub const TEMPLATE_SIZE: u32 = 32;

/// Window pixels strictly darker than this count as ink.
pub const INK_THRESHOLD: u8 = 128;

/// Region crop width is clamped to this range before matching.
pub const WINDOW_WIDTH_RANGE: (u32, u32) = (12, 200);

/// Region crop height is clamped to this range before matching.
pub const WINDOW_HEIGHT_RANGE: (u32, u32) = (12, 80);

/// The outcome of digit reading for one region.
///
/// A reading is produced for every attempted region, including those where
/// nothing matched (`text` empty, `confidence` 0.0), so consumers can tell
/// "attempted, no match" apart from "not attempted".
#[derive(Clone, Debug, Serialize)]
pub struct DigitReading {
    /// Index into the pipeline's region list.
    pub region_index: usize,
    /// Recognized digits in left-to-right order; may be empty.
    pub text: String,
    /// 1.0 = a perfect template match among the accepted positions,
    /// approaching 0.0 at the acceptance threshold; 0.0 when nothing
    /// matched.
    pub confidence: f32,
    /// Number of window positions scored.
    pub windows_tried: u32,
}

/// Holds the ten digit templates, rendered once per pipeline invocation.
pub struct DigitReader {
    templates: Vec<Vec<bool>>,
}

impl DigitReader {
    pub fn new(rasterizer: &dyn GlyphRasterizer) -> Self {
        let templates = (0..10u8)
            .map(|d| rasterizer.rasterize(d, TEMPLATE_SIZE))
            .collect();
        Self { templates }
    }

    /// Reads digits from the first `ocr_region_cap` regions.
    pub fn read_regions(
        &self,
        working: &RgbaImage,
        regions: &[Region],
        tunables: &Tunables,
    ) -> Vec<DigitReading> {
        regions
            .iter()
            .take(tunables.ocr_region_cap)
            .enumerate()
            .map(|(index, region)| self.read_region(working, index, region, tunables))
            .collect()
    }

    fn read_region(
        &self,
        working: &RgbaImage,
        region_index: usize,
        region: &Region,
        tunables: &Tunables,
    ) -> DigitReading {
        let (bits, width, height) = region_window(working, region);
        let size = TEMPLATE_SIZE as usize;
        let step = (tunables.ocr_window_step.max(1)) as usize;

        // Best match per x position, scanning every vertical offset.
        let mut hits: Vec<(usize, u8, u32)> = Vec::new();
        let mut windows_tried = 0u32;
        let mut wx = 0;
        while wx + size <= width {
            let mut best: Option<(u8, u32)> = None;
            let mut wy = 0;
            while wy + size <= height {
                windows_tried += 1;
                for (digit, template) in self.templates.iter().enumerate() {
                    let sad = window_sad(&bits, width, wx, wy, template, size);
                    if best.is_none_or(|(_, b)| sad < b) {
                        best = Some((digit as u8, sad));
                    }
                }
                wy += step;
            }
            if let Some((digit, sad)) = best {
                if sad < tunables.ocr_match_threshold {
                    hits.push((wx, digit, sad));
                }
            }
            wx += step;
        }

        // Left-to-right dedup: drop matches too close to the previously
        // accepted x position.
        let dedup_px = tunables.ocr_dedup_frac * TEMPLATE_SIZE as f32;
        let mut text = String::new();
        let mut best_sad: Option<u32> = None;
        let mut last_x: Option<f32> = None;
        for (x, digit, sad) in hits {
            if let Some(lx) = last_x {
                if (x as f32 - lx) < dedup_px {
                    continue;
                }
            }
            text.push((b'0' + digit) as char);
            last_x = Some(x as f32);
            best_sad = Some(best_sad.map_or(sad, |b: u32| b.min(sad)));
        }

        let confidence = match best_sad {
            Some(sad) => 1.0 - sad as f32 / tunables.ocr_match_threshold as f32,
            None => 0.0,
        };

        debug!(region_index, text = %text, confidence, windows_tried, "digit reading");
        DigitReading {
            region_index,
            text,
            confidence,
            windows_tried,
        }
    }
}

/// Crops a region from the working buffer, clamps it into the bounded
/// window size, and binarizes it with the ink threshold.
///
/// Windows smaller than the template are centered on a blank canvas so
/// small regions are still attempted (the clamp floor of 12 px is below
/// the 32 px template edge).
fn region_window(working: &RgbaImage, region: &Region) -> (Vec<bool>, usize, usize) {
    let x = region.x.min(working.width().saturating_sub(1));
    let y = region.y.min(working.height().saturating_sub(1));
    let w = region.width.max(1).min(working.width() - x);
    let h = region.height.max(1).min(working.height() - y);

    let crop = imageops::crop_imm(working, x, y, w, h).to_image();
    let gray = gradient::grayscale(&crop);

    let target_w = w.clamp(WINDOW_WIDTH_RANGE.0, WINDOW_WIDTH_RANGE.1);
    let target_h = h.clamp(WINDOW_HEIGHT_RANGE.0, WINDOW_HEIGHT_RANGE.1);
    let gray = if (target_w, target_h) != (w, h) {
        imageops::resize(&gray, target_w, target_h, FilterType::Triangle)
    } else {
        gray
    };

    let tw = target_w as usize;
    let th = target_h as usize;
    let pw = tw.max(TEMPLATE_SIZE as usize);
    let ph = th.max(TEMPLATE_SIZE as usize);
    let ox = (pw - tw) / 2;
    let oy = (ph - th) / 2;

    let mut bits = vec![false; pw * ph];
    for (i, &v) in gray.as_raw().iter().enumerate() {
        if v < INK_THRESHOLD {
            let gx = i % tw;
            let gy = i / tw;
            bits[(gy + oy) * pw + (gx + ox)] = true;
        }
    }
    (bits, pw, ph)
}

/// Mismatched-pixel count between a window position and a template.
fn window_sad(
    bits: &[bool],
    stride: usize,
    wx: usize,
    wy: usize,
    template: &[bool],
    size: usize,
) -> u32 {
    let mut sad = 0u32;
    for ty in 0..size {
        let row = (wy + ty) * stride + wx;
        let trow = ty * size;
        for tx in 0..size {
            if bits[row + tx] != template[trow + tx] {
                sad += 1;
            }
        }
    }
    sad
}
