//! Resampling: the display thumbnail and the downscaled working buffer.
//!
//! Every analysis stage operates on the working buffer, never on the
//! native pixels, so its size bounds the CPU cost of the whole pipeline.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::debug;

use crate::error::AnalyzeError;

/// Long-edge cap for the working buffer.
pub const WORKING_LONG_EDGE: u32 = 1400;

/// The working buffer keeps at least this long edge unless the source is
/// already smaller.
pub const MIN_LONG_EDGE: u32 = 128;

/// Produces the working buffer for the analysis stages.
///
/// Two independent caps apply: if the native area exceeds `max_area`, a
/// uniform pre-scale of `sqrt(max_area / area)` bounds CPU cost; then the
/// long edge is capped at [`WORKING_LONG_EDGE`]. Images are never
/// upscaled. Total function: always succeeds.
pub fn working_buffer(pixels: &RgbaImage, max_area: u64) -> RgbaImage {
    let (width, height) = pixels.dimensions();
    let area = width as u64 * height as u64;

    let mut scale = 1.0f64;
    if max_area > 0 && area > max_area {
        scale = (max_area as f64 / area as f64).sqrt();
    }

    let long_edge = width.max(height);
    let scaled_long = long_edge as f64 * scale;
    if scaled_long > WORKING_LONG_EDGE as f64 {
        scale *= WORKING_LONG_EDGE as f64 / scaled_long;
    }

    if scale >= 1.0 {
        return pixels.clone();
    }

    // Guarantee a usable minimum resolution for the downstream stages.
    let mut target_long = (long_edge as f64 * scale).round() as u32;
    if target_long < MIN_LONG_EDGE {
        target_long = MIN_LONG_EDGE.min(long_edge);
    }
    let scale = target_long as f64 / long_edge as f64;

    let target_w = ((width as f64 * scale).round() as u32).max(1);
    let target_h = ((height as f64 * scale).round() as u32).max(1);
    debug!(width, height, target_w, target_h, "downscaling working buffer");
    imageops::resize(pixels, target_w, target_h, FilterType::Triangle)
}

/// Re-encodes the image as a JPEG thumbnail no wider than `max_width`,
/// preserving aspect ratio with nearest-integer height rounding.
pub fn thumbnail(
    pixels: &RgbaImage,
    max_width: u32,
    quality: f32,
) -> Result<Vec<u8>, AnalyzeError> {
    let (width, height) = pixels.dimensions();
    let scaled;
    let source = if width > max_width && max_width > 0 {
        let target_h = ((height as f64 * max_width as f64 / width as f64).round() as u32).max(1);
        scaled = imageops::resize(pixels, max_width, target_h, FilterType::Triangle);
        &scaled
    } else {
        pixels
    };

    // JPEG carries no alpha channel.
    let rgb = image::DynamicImage::ImageRgba8(source.clone()).to_rgb8();
    let mut out = Vec::new();
    let jpeg_quality = (quality.clamp(0.0, 1.0) * 100.0).round() as u8;
    let mut encoder = JpegEncoder::new_with_quality(&mut out, jpeg_quality.max(1));
    encoder
        .encode_image(&rgb)
        .map_err(AnalyzeError::EncodeFailure)?;
    Ok(out)
}
