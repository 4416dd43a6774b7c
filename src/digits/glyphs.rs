//! Digit glyph rasterization for template matching.
//!
//! The matcher only needs ten consistent binary glyphs; which rasterizer
//! produces them is a pluggable collaborator. The built-in
//! [`SegmentGlyphs`] draws seven-segment-style strokes, which keeps the
//! templates deterministic and free of font assets.

/// Renders a single digit glyph into a `size x size` binary bitmap
/// (row-major, true = ink).
pub trait GlyphRasterizer {
    fn rasterize(&self, digit: u8, size: u32) -> Vec<bool>;
}

// Segment bits, laid out like a seven-segment display:
// A top, B top-right, C bottom-right, D bottom, E bottom-left,
// F top-left, G middle.
const SEG_A: u8 = 1 << 0;
const SEG_B: u8 = 1 << 1;
const SEG_C: u8 = 1 << 2;
const SEG_D: u8 = 1 << 3;
const SEG_E: u8 = 1 << 4;
const SEG_F: u8 = 1 << 5;
const SEG_G: u8 = 1 << 6;

const DIGIT_SEGMENTS: [u8; 10] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,         // 0
    SEG_B | SEG_C,                                         // 1
    SEG_A | SEG_B | SEG_G | SEG_E | SEG_D,                 // 2
    SEG_A | SEG_B | SEG_G | SEG_C | SEG_D,                 // 3
    SEG_F | SEG_G | SEG_B | SEG_C,                         // 4
    SEG_A | SEG_F | SEG_G | SEG_C | SEG_D,                 // 5
    SEG_A | SEG_F | SEG_G | SEG_E | SEG_C | SEG_D,         // 6
    SEG_A | SEG_B | SEG_C,                                 // 7
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G, // 8
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,         // 9
];

/// Seven-segment-style stroke rasterizer.
pub struct SegmentGlyphs;

impl GlyphRasterizer for SegmentGlyphs {
    fn rasterize(&self, digit: u8, size: u32) -> Vec<bool> {
        let s = size as usize;
        let mut bits = vec![false; s * s];
        let segments = DIGIT_SEGMENTS[(digit % 10) as usize];

        let margin = (s / 8).max(1);
        let thickness = (s / 8).max(1);
        let mid = s / 2;

        let mut fill = |x0: usize, y0: usize, x1: usize, y1: usize| {
            for y in y0..y1.min(s) {
                for x in x0..x1.min(s) {
                    bits[y * s + x] = true;
                }
            }
        };

        if segments & SEG_A != 0 {
            fill(margin, margin, s - margin, margin + thickness);
        }
        if segments & SEG_D != 0 {
            fill(margin, s - margin - thickness, s - margin, s - margin);
        }
        if segments & SEG_G != 0 {
            fill(margin, (s - thickness) / 2, s - margin, (s - thickness) / 2 + thickness);
        }
        if segments & SEG_F != 0 {
            fill(margin, margin, margin + thickness, mid);
        }
        if segments & SEG_B != 0 {
            fill(s - margin - thickness, margin, s - margin, mid);
        }
        if segments & SEG_E != 0 {
            fill(margin, mid, margin + thickness, s - margin);
        }
        if segments & SEG_C != 0 {
            fill(s - margin - thickness, mid, s - margin, s - margin);
        }

        bits
    }
}
