use crate::game::{GameState, SessionPhase};
use crate::glyphs::GlyphCache;
use log::debug;
use macroquad::prelude::{Color, Image, BLACK, WHITE};

pub const BACKGROUND: Color = BLACK;
pub const FOREGROUND: Color = WHITE;

/// Edge length of one glyph cell in pixels
pub const GLYPH_CELL_SIZE: u16 = 10;
pub const SCOREBOARD_Y: i32 = 20;

pub const LOBBY_MESSAGE: &str = "Waiting on another player...";
pub const LOBBY_FONT_SIZE: f32 = 20.0;

/// Text drawn centred on top of the canvas pixels
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub color: Color,
}

/// CPU-side play surface. The window uploads it to a texture after each repaint.
pub struct Canvas {
    image: Image,
    caption: Option<Caption>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Canvas {
            image: Image::gen_image_color(width, height, BACKGROUND),
            caption: None,
        }
    }

    pub fn width(&self) -> i32 {
        i32::from(self.image.width)
    }

    pub fn height(&self) -> i32 {
        i32::from(self.image.height)
    }

    pub fn image(&self) -> &Image {
        &self.image
    }

    pub fn caption(&self) -> Option<&Caption> {
        self.caption.as_ref()
    }

    /// RGBA bytes at (`x`, `y`), None outside the surface
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        let i = self.index(x, y);
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.image.bytes[i..i + 4]);
        Some(rgba)
    }

    /// Paints every pixel and drops the caption
    pub fn clear(&mut self, color: Color) {
        let rgba: [u8; 4] = color.into();
        for pixel in self.image.bytes.chunks_exact_mut(4) {
            pixel.copy_from_slice(&rgba);
        }
        self.caption = None;
    }

    /// Fills a rectangle, clipped to the surface
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        let rgba: [u8; 4] = color.into();
        let x0 = x.clamp(0, self.width());
        let y0 = y.clamp(0, self.height());
        let x1 = x.saturating_add(width).clamp(0, self.width());
        let y1 = y.saturating_add(height).clamp(0, self.height());

        for row in y0..y1 {
            for column in x0..x1 {
                let i = self.index(column, row);
                self.image.bytes[i..i + 4].copy_from_slice(&rgba);
            }
        }
    }

    /// Copies the non-transparent pixels of `source` with its top-left corner at (`x`, `y`)
    pub fn draw_image(&mut self, source: &Image, x: i32, y: i32) {
        let source_width = usize::from(source.width);

        for (n, pixel) in source.bytes.chunks_exact(4).enumerate() {
            if pixel[3] == 0 {
                continue;
            }

            let dx = x.saturating_add((n % source_width) as i32);
            let dy = y.saturating_add((n / source_width) as i32);
            if dx < 0 || dy < 0 || dx >= self.width() || dy >= self.height() {
                continue;
            }

            let i = self.index(dx, dy);
            self.image.bytes[i..i + 4].copy_from_slice(pixel);
        }
    }

    pub fn fill_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, color: Color) {
        self.caption = Some(Caption {
            text: text.to_string(),
            x,
            y,
            font_size,
            color,
        });
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y as usize * usize::from(self.image.width) + x as usize) * 4
    }
}

/// Horizontal start of a score made of `digit_count` glyphs.
///
/// The surface is split into three segments and each player's score is
/// centred on the boundary after the `player_index`th one.
pub fn score_offset(
    surface_width: f32,
    player_index: usize,
    digit_count: usize,
    cell_size: f32,
) -> f32 {
    let segment_width = surface_width / 3.0;
    let char_width = cell_size * 4.0;

    segment_width * (player_index + 1) as f32 - char_width * digit_count as f32 / 2.0
        + cell_size / 2.0
}

/// Decimal digits of a score, most significant first. Negative scores show as 0.
pub fn score_digits(score: i32) -> Vec<u8> {
    score
        .max(0)
        .to_string()
        .bytes()
        .map(|b| b - b'0')
        .collect()
}

/// Paints the match onto a canvas
pub struct RenderPipeline {
    glyphs: GlyphCache,
    frames_drawn: u64,
}

impl RenderPipeline {
    pub fn new() -> Self {
        Self::with_glyphs(GlyphCache::new(GLYPH_CELL_SIZE, FOREGROUND))
    }

    pub fn with_glyphs(glyphs: GlyphCache) -> Self {
        RenderPipeline {
            glyphs,
            frames_drawn: 0,
        }
    }

    /// Number of full repaints so far
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Repaints using the view that matches the session phase
    pub fn repaint(&mut self, canvas: &mut Canvas, state: &GameState) {
        match state.phase() {
            SessionPhase::AwaitingOpponent => self.draw_lobby_view(canvas, state),
            SessionPhase::InSession => self.draw_frame(canvas, state),
        }
    }

    pub fn draw_frame(&mut self, canvas: &mut Canvas, state: &GameState) {
        canvas.clear(BACKGROUND);

        for entity in state.entities() {
            canvas.fill_rect(entity.x, entity.y, entity.width, entity.height, FOREGROUND);
        }

        self.draw_scoreboard(canvas, state.scores);

        self.frames_drawn += 1;
        debug!("Frame {} drawn", self.frames_drawn);
    }

    pub fn draw_lobby_view(&mut self, canvas: &mut Canvas, state: &GameState) {
        self.draw_frame(canvas, state);

        let x = canvas.width() as f32 / 2.0;
        let y = canvas.height() as f32 / 2.0 - 60.0;
        canvas.fill_text(LOBBY_MESSAGE, x, y, LOBBY_FONT_SIZE, FOREGROUND);
    }

    fn draw_scoreboard(&self, canvas: &mut Canvas, scores: [i32; 2]) {
        let cell_size = f32::from(self.glyphs.cell_size());
        let char_width = cell_size * 4.0;

        for (player_index, score) in scores.iter().enumerate() {
            let digits = score_digits(*score);
            let offset =
                score_offset(canvas.width() as f32, player_index, digits.len(), cell_size);

            for (j, digit) in digits.iter().enumerate() {
                if let Some(glyph) = self.glyphs.glyph(*digit) {
                    let x = (offset + j as f32 * char_width).round() as i32;
                    canvas.draw_image(glyph, x, SCOREBOARD_Y);
                }
            }
        }
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}
