use clap::Parser;
use client::config::{Args, ClientConfig};
use client::display::{window_conf, Display};
use client::input::InputDispatcher;
use client::network::{Client, Connection};
use log::info;
use macroquad::prelude::*;
use macroquad::Window;
use shared::{CANVAS_HEIGHT, CANVAS_WIDTH};

const WIDTH: u16 = CANVAS_WIDTH as u16;
const HEIGHT: u16 = CANVAS_HEIGHT as u16;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();
    let config = ClientConfig::resolve(&args)?;

    info!("Starting client...");
    info!("Controls: Up/Down arrows or touch the upper/lower half to move, Escape to quit");

    let connection = Connection::open(&config.server, config.fake_ping_ms)?;

    Window::from_config(
        window_conf(WIDTH, HEIGHT, config.scale),
        run(connection, config.scale),
    );

    Ok(())
}

async fn run(connection: Connection, scale: f32) {
    prevent_quit();

    let mut client = Client::new(connection, WIDTH, HEIGHT);
    let mut display = Display::new(client.canvas(), client.renderer().frames_drawn(), scale);

    while !is_quit_requested() && !is_key_pressed(KeyCode::Escape) {
        client.set_viewport_height(screen_height());
        for input in InputDispatcher::poll() {
            client.handle_input(input);
        }

        client.pump_network();

        display.present(client.canvas(), client.renderer().frames_drawn());
        next_frame().await;
    }

    client.shutdown();
}
