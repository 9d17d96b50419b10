//! Puts the play surface on screen

use crate::rendering::Canvas;
use macroquad::prelude::*;
use macroquad::window::Conf;

pub fn window_conf(width: u16, height: u16, scale: f32) -> Conf {
    Conf {
        window_title: "Pong".to_string(),
        window_width: (f32::from(width) * scale).round() as i32,
        window_height: (f32::from(height) * scale).round() as i32,
        window_resizable: false,
        ..Default::default()
    }
}

/// Texture copy of the canvas, refreshed only when the canvas was repainted
pub struct Display {
    texture: Texture2D,
    uploaded_frame: u64,
    scale: f32,
}

impl Display {
    /// Needs a live macroquad context
    pub fn new(canvas: &Canvas, frames_drawn: u64, scale: f32) -> Self {
        let texture = Texture2D::from_image(canvas.image());
        texture.set_filter(FilterMode::Nearest);

        Display {
            texture,
            uploaded_frame: frames_drawn,
            scale,
        }
    }

    pub fn present(&mut self, canvas: &Canvas, frames_drawn: u64) {
        if frames_drawn != self.uploaded_frame {
            self.texture.update(canvas.image());
            self.uploaded_frame = frames_drawn;
        }

        clear_background(BLACK);
        draw_texture_ex(
            &self.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(
                    canvas.width() as f32 * self.scale,
                    canvas.height() as f32 * self.scale,
                )),
                ..Default::default()
            },
        );

        if let Some(caption) = canvas.caption() {
            let font_size = caption.font_size * self.scale;
            let dimensions = measure_text(&caption.text, None, font_size as u16, 1.0);
            draw_text(
                &caption.text,
                caption.x * self.scale - dimensions.width / 2.0,
                caption.y * self.scale,
                font_size,
                caption.color,
            );
        }
    }
}
