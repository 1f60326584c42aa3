//! Alert text overlay.
//!
//! Renders a line of text with a built-in 5×7 bitmap font, each font pixel
//! drawn as a `scale × scale` block.  Lowercase letters render as uppercase;
//! characters outside the font render as `?`.  Drawing is clipped to the
//! frame.

use image::Rgb;

use super::Frame;

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
/// Horizontal advance in font pixels (glyph + one column gap).
const ADVANCE: u32 = GLYPH_W + 1;

/// Alert red.
pub const ALERT_RED: Rgb<u8> = Rgb([255, 0, 0]);

#[derive(Debug, Clone)]
pub struct Overlay {
    text: String,
    /// Left edge of the first glyph.
    x: u32,
    /// Baseline: the bottom row of the glyphs sits just above it.
    baseline: u32,
    scale: u32,
    color: Rgb<u8>,
}

impl Overlay {
    pub fn new(text: impl Into<String>, x: u32, baseline: u32, scale: u32) -> Self {
        Self {
            text: text.into(),
            x,
            baseline,
            scale: scale.max(1),
            color: ALERT_RED,
        }
    }

    pub fn with_color(mut self, color: Rgb<u8>) -> Self {
        self.color = color;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Bounding box `(x, y, w, h)` of the rendered text.
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        let h = GLYPH_H * self.scale;
        let chars = self.text.chars().count() as u32;
        let w = (chars * ADVANCE).saturating_sub(1) * self.scale;
        (self.x, self.baseline.saturating_sub(h), w, h)
    }

    /// Composite the text onto `frame` in place.
    pub fn draw(&self, frame: &mut Frame) {
        let top = i64::from(self.baseline) - i64::from(GLYPH_H * self.scale);
        for (i, ch) in self.text.chars().enumerate() {
            let rows = glyph(ch);
            let gx = i64::from(self.x) + (i as i64) * i64::from(ADVANCE * self.scale);
            for (r, bits) in rows.iter().enumerate() {
                for c in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - c)) == 0 {
                        continue;
                    }
                    let px = gx + i64::from(c * self.scale);
                    let py = top + (r as i64) * i64::from(self.scale);
                    self.fill_block(frame, px, py);
                }
            }
        }
    }

    fn fill_block(&self, frame: &mut Frame, x0: i64, y0: i64) {
        let (w, h) = (i64::from(frame.width()), i64::from(frame.height()));
        let s = i64::from(self.scale);
        for y in y0.max(0)..(y0 + s).min(h) {
            for x in x0.max(0)..(x0 + s).min(w) {
                frame.put_pixel(x as u32, y as u32, self.color);
            }
        }
    }
}

/// Row bitmaps, top to bottom, MSB = leftmost of the 5 columns.
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ' ' => [0x00; 7],
        _ => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04],
    }
}
