//! Dot-matrix font for template rendering.
//!
//! # Responsibility
//! - Map characters to 5x5 pixel bitmaps inside a 5-row by 7-column
//!   character cell and stamp text into a grid.
//!
//! # Invariants
//! - Rendering is a pure lookup-and-write: the same text at the same
//!   column always turns on the same set of cells.
//! - Stamping never grows the grid; columns past the right edge are
//!   dropped silently.

use crate::model::pattern::MAX_INTENSITY;

/// Glyphs are 5 pixel rows tall.
pub const GLYPH_ROWS: usize = 5;
/// Glyph bitmaps are 5 pixel columns wide.
pub const GLYPH_COLS: usize = 5;
/// Each character occupies a 7-column cell: the 5-pixel bitmap plus two
/// trailing spacing columns.
pub const GLYPH_ADVANCE: usize = GLYPH_COLS + 2;
/// Glyphs start on grid row 1, centering the 5-row band in the 7-row grid.
pub const GLYPH_ROW_OFFSET: usize = 1;

/// Returns the bitmap for `ch`, or `None` for unsupported characters.
///
/// Each array entry is one pixel row, top first; bit 4 is the leftmost
/// column. Lowercase letters share the uppercase bitmaps.
pub fn glyph(ch: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match ch.to_ascii_uppercase() {
        ' ' => [0b00000; GLYPH_ROWS],
        'A' => [0b01110, 0b10001, 0b11111, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b11110],
        'C' => [0b01111, 0b10000, 0b10000, 0b10000, 0b01111],
        'D' => [0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000],
        'G' => [0b01111, 0b10000, 0b10011, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b11111],
        'J' => [0b00111, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b11100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b11110, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b11110, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b01110, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        'Y' => [0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
        '0' => [0b01110, 0b10011, 0b10101, 0b11001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00110, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00110, 0b00001, 0b11110],
        '4' => [0b00110, 0b01010, 0b10010, 0b11111, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b11110],
        '6' => [0b01110, 0b10000, 0b11110, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b00100],
        '8' => [0b01110, 0b10001, 0b01110, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b01111, 0b00001, 0b01110],
        '-' => [0b00000, 0b00000, 0b11111, 0b00000, 0b00000],
        '+' => [0b00100, 0b00100, 0b11111, 0b00100, 0b00100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00110, 0b00000, 0b00100],
        _ => return None,
    };
    Some(rows)
}

/// Stamps `text` into `grid` with the glyph band's left edge at
/// `start_col`, writing intensity 9 into "on" pixels.
///
/// Cells under "off" pixels keep their previous value. Unsupported
/// characters consume one advance without drawing. Returns the number of
/// cells actually written; columns beyond the grid width are truncated
/// silently.
pub fn stamp_text(grid: &mut [Vec<u8>], start_col: usize, text: &str) -> usize {
    let width = grid.first().map_or(0, Vec::len);
    let mut written = 0;

    for (index, ch) in text.chars().enumerate() {
        let left = start_col + index * GLYPH_ADVANCE;
        if left >= width {
            break;
        }
        let Some(rows) = glyph(ch) else {
            continue;
        };
        for (pixel_row, bits) in rows.iter().enumerate() {
            for pixel_col in 0..GLYPH_COLS {
                if bits & (1 << (GLYPH_COLS - 1 - pixel_col)) == 0 {
                    continue;
                }
                let col = left + pixel_col;
                if col >= width {
                    continue;
                }
                grid[GLYPH_ROW_OFFSET + pixel_row][col] = MAX_INTENSITY;
                written += 1;
            }
        }
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pattern::blank_grid;

    #[test]
    fn stamping_is_deterministic() {
        let mut first = blank_grid(20);
        let mut second = blank_grid(20);
        stamp_text(&mut first, 2, "HI");
        stamp_text(&mut second, 2, "HI");
        assert_eq!(first, second);
    }

    #[test]
    fn dash_writes_a_single_row() {
        let mut grid = blank_grid(10);
        let written = stamp_text(&mut grid, 0, "-");
        assert_eq!(written, 5);
        assert_eq!(grid[GLYPH_ROW_OFFSET + 2][..5], [9, 9, 9, 9, 9]);
        assert!(grid[GLYPH_ROW_OFFSET].iter().all(|&v| v == 0));
    }

    #[test]
    fn characters_occupy_seven_column_cells() {
        let mut grid = blank_grid(20);
        stamp_text(&mut grid, 0, "HI");
        // H's verticals at columns 0 and 4, I's top bar starting at 7.
        assert_eq!(grid[GLYPH_ROW_OFFSET][0], 9);
        assert_eq!(grid[GLYPH_ROW_OFFSET][4], 9);
        assert!(grid.iter().all(|row| row[5] == 0 && row[6] == 0));
        assert_eq!(grid[GLYPH_ROW_OFFSET][7..12], [9, 9, 9, 9, 9]);
        assert!(grid.iter().all(|row| row[12..].iter().all(|&v| v == 0)));
    }

    #[test]
    fn overflow_is_truncated_silently() {
        let mut narrow = blank_grid(3);
        let written = stamp_text(&mut narrow, 0, "II");
        // Only the first three columns of the first glyph fit.
        assert!(written > 0);
        assert!(narrow.iter().all(|row| row.len() == 3));
    }
}
