//! Pre-rendered digit bitmaps for the scoreboard

use macroquad::prelude::{Color, Image, BLANK};

pub const GLYPH_COLUMNS: usize = 3;
pub const GLYPH_ROWS: usize = 5;

/// 3x5 bit patterns for the digits 0-9, row-major
pub const DIGIT_PATTERNS: [&str; 10] = [
    "111101101101111",
    "010010010010010",
    "111001111100111",
    "111001111001111",
    "101101111001001",
    "111100111001111",
    "111100111101111",
    "111001001001001",
    "111101111101111",
    "111101111001111",
];

/// Ten digit images built once at startup and only read afterwards
pub struct GlyphCache {
    cell_size: u16,
    glyphs: [Image; 10],
}

impl GlyphCache {
    pub fn new(cell_size: u16, color: Color) -> Self {
        Self {
            cell_size,
            glyphs: std::array::from_fn(|digit| {
                render_digit(DIGIT_PATTERNS[digit], cell_size, color)
            }),
        }
    }

    pub fn cell_size(&self) -> u16 {
        self.cell_size
    }

    /// Returns the image for `digit`, or None when it is not a single decimal digit
    pub fn glyph(&self, digit: u8) -> Option<&Image> {
        self.glyphs.get(usize::from(digit))
    }
}

fn render_digit(pattern: &str, cell_size: u16, color: Color) -> Image {
    let width = cell_size * GLYPH_COLUMNS as u16;
    let height = cell_size * GLYPH_ROWS as u16;
    let mut image = Image::gen_image_color(width, height, BLANK);

    for (i, bit) in pattern.bytes().enumerate() {
        if bit != b'1' {
            continue;
        }

        let left = (i % GLYPH_COLUMNS) as u32 * u32::from(cell_size);
        let top = (i / GLYPH_COLUMNS) as u32 * u32::from(cell_size);
        for y in top..top + u32::from(cell_size) {
            for x in left..left + u32::from(cell_size) {
                image.set_pixel(x, y, color);
            }
        }
    }

    image
}
