//! # Pong Client Library
//!
//! The client half of a two-player pong game. The game server owns the
//! simulation: it assigns each connection a player id, pushes paddle and ball
//! positions plus the score, and receives movement intents. The client only
//! mirrors that state on screen and forwards the local player's input.
//!
//! ## Data Flow
//!
//! Inbound, a binary WebSocket frame is decoded by [`shared::decode`] into a
//! typed event, applied to the [`game::GameState`] in full, and then the
//! [`rendering::RenderPipeline`] repaints the [`rendering::Canvas`].
//!
//! Outbound, the [`input::InputDispatcher`] turns key and touch edges into
//! [`shared::Intent`]s which are encoded with the assigned player id and
//! handed to the [`network::Connection`].
//!
//! ## Threading
//!
//! A single event loop owns the game state, the canvas and the renderer, and
//! handles every frame and input event to completion before the next one, so a
//! repaint never sees a half-applied update. The WebSocket is driven by a tokio
//! runtime on a background thread that only shuttles raw bytes over channels.
//!
//! ## Module Organization
//!
//! - `config`: command line flags and the optional TOML config file
//! - `display`: macroquad window that shows the canvas
//! - `game`: paddles, ball, scores, player id and session phase
//! - `glyphs`: cached digit bitmaps for the scoreboard
//! - `input`: raw input to intent mapping
//! - `network`: the WebSocket connection and the `Client` event handlers
//! - `rendering`: software canvas and the repaint pipeline
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::network::{Client, Connection};
//! use shared::{Intent, CANVAS_HEIGHT, CANVAS_WIDTH};
//!
//! let connection = Connection::open("ws://127.0.0.1:8001", 0)?;
//! let mut client = Client::new(connection, CANVAS_WIDTH as u16, CANVAS_HEIGHT as u16);
//!
//! // Apply whatever the server sent since the last frame
//! client.pump_network();
//! client.send_intent(Intent::MoveUp);
//!
//! client.shutdown();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Known Gaps
//!
//! There is no reconnection. When the socket closes the view freezes on the
//! last state received and intents are dropped with a warning.

pub mod config;
pub mod display;
pub mod game;
pub mod glyphs;
pub mod input;
pub mod network;
pub mod rendering;
