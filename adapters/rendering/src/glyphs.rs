//! Tiny 3x5 bitmap font covering the letters used on the title screen.

use dynamo_core::Point;

use crate::{Canvas, Tone};

const GLYPH_WIDTH: u32 = 3;
const GLYPH_SPACING: u32 = 1;

/// Height of a glyph at scale 1.
pub const GLYPH_HEIGHT: u32 = 5;

/// Rows of three bits, most significant bit on the left.
fn glyph(character: char) -> Option<[u8; 5]> {
    let rows = match character.to_ascii_uppercase() {
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        ' ' => [0; 5],
        _ => return None,
    };
    Some(rows)
}

/// Width of `text` in pixels at scale 1.
#[must_use]
pub fn text_width(text: &str) -> u32 {
    let count = text.chars().count() as u32;
    (count * (GLYPH_WIDTH + GLYPH_SPACING)).saturating_sub(GLYPH_SPACING)
}

/// Draws `text` with its top-left corner at `origin`, each font pixel
/// magnified to a `scale` x `scale` block. Unknown characters leave a gap.
pub fn draw_text(canvas: &mut Canvas, text: &str, origin: Point, scale: i32, tone: Tone) {
    let scale = scale.max(1);
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) as i32 * scale;

    for (index, character) in text.chars().enumerate() {
        let Some(rows) = glyph(character) else {
            continue;
        };
        let left = origin.x() + index as i32 * advance;

        for (row, bits) in rows.iter().enumerate() {
            for column in 0..GLYPH_WIDTH {
                if bits & (0b100 >> column) == 0 {
                    continue;
                }
                let x = left + column as i32 * scale;
                let y = origin.y() + row as i32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        canvas.set(Point::new(x + dx, y + dy), tone);
                    }
                }
            }
        }
    }
}
