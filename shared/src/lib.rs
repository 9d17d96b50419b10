//! Wire protocol and playfield constants shared by the pong client and its tests.

pub mod protocol;

pub use protocol::{decode, encode_intent, DecodeError, Directive, Intent, Positions, ServerEvent};

/// Logical canvas size used by the game server
pub const CANVAS_WIDTH: i32 = 600;
pub const CANVAS_HEIGHT: i32 = 400;

pub const PADDLE_WIDTH: i32 = 20;
pub const PADDLE_HEIGHT: i32 = 100;
pub const BALL_SIZE: i32 = 20;

pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8001";
