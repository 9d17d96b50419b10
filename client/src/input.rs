//! Keyboard and touch handling, reduced to paddle movement intents

use macroquad::prelude::*;
use shared::Intent;

/// Raw input events the dispatcher understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    /// `y` is measured from the top of the viewport
    TouchStart { y: f32 },
    TouchEnd,
}

/// Maps raw events to intents. Every qualifying event yields one intent, repeats included.
pub struct InputDispatcher {
    viewport_height: f32,
}

impl InputDispatcher {
    pub fn new(viewport_height: f32) -> Self {
        Self { viewport_height }
    }

    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
    }

    pub fn map(&self, input: RawInput) -> Option<Intent> {
        match input {
            RawInput::KeyDown(KeyCode::Up) => Some(Intent::MoveUp),
            RawInput::KeyDown(KeyCode::Down) => Some(Intent::MoveDown),
            RawInput::KeyDown(_) => None,
            RawInput::KeyUp(_) | RawInput::TouchEnd => Some(Intent::StopMoving),
            RawInput::TouchStart { y } => {
                let midline = self.viewport_height / 2.0;
                if y < midline {
                    Some(Intent::MoveUp)
                } else if y > midline {
                    Some(Intent::MoveDown)
                } else {
                    None
                }
            }
        }
    }

    /// Collects this frame's key and touch edges from the window.
    ///
    /// Presses come before releases so a tap inside one frame still ends in a stop.
    pub fn poll() -> Vec<RawInput> {
        let mut events: Vec<RawInput> = get_keys_pressed()
            .into_iter()
            .map(RawInput::KeyDown)
            .collect();

        let touches = touches();
        events.extend(
            touches
                .iter()
                .filter(|touch| matches!(touch.phase, TouchPhase::Started))
                .map(|touch| RawInput::TouchStart {
                    y: touch.position.y,
                }),
        );

        events.extend(get_keys_released().into_iter().map(RawInput::KeyUp));
        events.extend(
            touches
                .iter()
                .filter(|touch| matches!(touch.phase, TouchPhase::Ended))
                .map(|_| RawInput::TouchEnd),
        );

        events
    }
}
