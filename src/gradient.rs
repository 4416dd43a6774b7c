//! Grayscale conversion and Sobel gradient magnitudes.
//!
//! High magnitudes mark edges; the chart heuristic consumes the per-row
//! and per-column sums of this map.

use image::{GrayImage, Luma, RgbaImage};

/// Per-pixel gradient magnitudes (non-negative, unbounded), same
/// dimensions as the grayscale map it was derived from.
#[derive(Clone, Debug)]
pub struct GradientMap {
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` values.
    pub magnitudes: Vec<f32>,
}

/// Converts RGBA pixels to 8-bit grayscale.
///
/// Uses the ITU-R BT.601 luma formula Y = 0.299R + 0.587G + 0.114B,
/// rounded to the nearest integer.
pub fn grayscale(pixels: &RgbaImage) -> GrayImage {
    let (width, height) = pixels.dimensions();
    let mut out = GrayImage::new(width, height);
    for (x, y, pixel) in pixels.enumerate_pixels() {
        let luma = 0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32;
        out.put_pixel(x, y, Luma([luma.round() as u8]));
    }
    out
}

/// Applies the 3x3 Sobel operator to a grayscale map.
///
/// Magnitude is `hypot(gx, gy)`. Border pixels stay at zero: the kernel
/// needs a full 3x3 neighborhood.
pub fn sobel(gray: &GrayImage) -> GradientMap {
    let width = gray.width();
    let height = gray.height();
    let mut magnitudes = vec![0.0f32; (width as usize) * (height as usize)];

    if width >= 3 && height >= 3 {
        let w = width as usize;
        let data = gray.as_raw();
        let at = |x: usize, y: usize| data[y * w + x] as i32;

        for y in 1..(height as usize - 1) {
            for x in 1..(w - 1) {
                let gx = -at(x - 1, y - 1) + at(x + 1, y - 1) - 2 * at(x - 1, y)
                    + 2 * at(x + 1, y)
                    - at(x - 1, y + 1)
                    + at(x + 1, y + 1);
                let gy = -at(x - 1, y - 1) - 2 * at(x, y - 1) - at(x + 1, y - 1)
                    + at(x - 1, y + 1)
                    + 2 * at(x, y + 1)
                    + at(x + 1, y + 1);
                magnitudes[y * w + x] = (gx as f32).hypot(gy as f32);
            }
        }
    }

    GradientMap {
        width,
        height,
        magnitudes,
    }
}

/// Renders a gradient map back into a grayscale image, normalized so the
/// strongest edge is white. Diagnostic use only.
pub fn render_gradient_map(map: &GradientMap) -> GrayImage {
    let max = map.magnitudes.iter().copied().fold(0.0f32, f32::max);
    let mut out = GrayImage::new(map.width, map.height);
    if max <= 0.0 {
        return out;
    }
    for (i, &mag) in map.magnitudes.iter().enumerate() {
        let x = (i as u32) % map.width;
        let y = (i as u32) / map.width;
        out.put_pixel(x, y, Luma([(mag / max * 255.0).round() as u8]));
    }
    out
}
