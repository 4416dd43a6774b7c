//! End-to-end pipeline properties over synthetic images.

use chartsight::{AnalyzeInput, AnalyzeOptions, analyze};
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
        palette_seed: Some(20_240_817),
        ..AnalyzeOptions::default()
    }
}

/// White canvas with black rectangles (x, y, w, h).
fn canvas_with_rects(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        for &(rx, ry, rw, rh) in rects {
            if x >= rx && x < rx + rw && y >= ry && y < ry + rh {
                return Rgba([0, 0, 0, 255]);
            }
        }
        Rgba([255, 255, 255, 255])
    })
}

#[test]
fn native_metadata_is_independent_of_scaling_caps() {
    let img = RgbaImage::from_pixel(3000, 2000, Rgba([50, 100, 150, 255]));
    let input = png_input(&img);

    let tight = AnalyzeOptions {
        max_image_area: 10_000,
        ..seeded_options()
    };
    let result = analyze(&input, &tight).unwrap();
    assert_eq!(result.metadata.width, 3000);
    assert_eq!(result.metadata.height, 2000);
}

#[test]
fn thumbnail_preserves_aspect_ratio() {
    let img = RgbaImage::from_pixel(1920, 1080, Rgba([10, 10, 10, 255]));
    let result = analyze(&png_input(&img), &seeded_options()).unwrap();

    let thumb = image::load_from_memory(&result.thumbnail).unwrap();
    assert_eq!(thumb.width(), 800);
    let expected_h = 1080.0 * 800.0 / 1920.0;
    assert!((thumb.height() as f64 - expected_h).abs() <= 1.0);
}

#[test]
fn projection_row_and_column_totals_agree() {
    let img = RgbaImage::from_fn(320, 240, |x, y| {
        let v = ((x * 11 + y * 3) % 256) as u8;
        Rgba([v, 255 - v, v / 3, 255])
    });
    let result = analyze(&png_input(&img), &seeded_options()).unwrap();

    let rows: f64 = result.projection.row_sums.iter().map(|&s| s as f64).sum();
    let cols: f64 = result.projection.col_sums.iter().map(|&s| s as f64).sum();
    assert!((rows - cols).abs() < 1e-3 * rows.max(1.0));
}

#[test]
fn two_black_squares_become_two_regions() {
    let img = canvas_with_rects(300, 200, &[(20, 30, 40, 40), (180, 100, 50, 30)]);
    let result = analyze(&png_input(&img), &seeded_options()).unwrap();

    assert_eq!(result.regions.len(), 2);
    let a = &result.regions[0];
    assert!((a.x as i64 - 20).abs() <= 1 && (a.y as i64 - 30).abs() <= 1);
    assert!((a.width as i64 - 40).abs() <= 1 && (a.height as i64 - 40).abs() <= 1);
    let b = &result.regions[1];
    assert!((b.x as i64 - 180).abs() <= 1 && (b.y as i64 - 100).abs() <= 1);
    assert!((b.width as i64 - 50).abs() <= 1 && (b.height as i64 - 30).abs() <= 1);

    // Every attempted region gets an explicit reading, matched or not.
    assert_eq!(result.readings.len(), 2);
}

#[test]
fn gridlines_detected_as_chart_but_noise_is_not() {
    let grid = RgbaImage::from_fn(400, 300, |x, y| {
        if x % 40 == 0 || y % 40 == 0 {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    });
    let result = analyze(&png_input(&grid), &seeded_options()).unwrap();
    assert!(result.chart_detected);

    let mut state = 0x9E3779B97F4A7C15u64;
    let noise = RgbaImage::from_fn(400, 300, |_, _| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let v = (state >> 32) as u8;
        Rgba([v, v, v, 255])
    });
    let result = analyze(&png_input(&noise), &seeded_options()).unwrap();
    assert!(!result.chart_detected);
}

#[test]
fn seeded_analysis_is_idempotent() {
    let img = RgbaImage::from_fn(256, 192, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8, 255])
    });
    let input = png_input(&img);
    let options = seeded_options();

    let first = analyze(&input, &options).unwrap();
    let second = analyze(&input, &options).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}
