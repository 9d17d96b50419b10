use crate::game::GameState;
use crate::input::{InputDispatcher, RawInput};
use crate::rendering::{Canvas, RenderPipeline};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use shared::{decode, encode_intent, Intent};
use std::collections::VecDeque;
use std::thread;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::{sleep_until, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Commands from the event loop to the socket task
#[derive(Debug)]
enum Outbound {
    Frame(Vec<u8>),
    Close,
}

/// One WebSocket to the game server, driven by a tokio runtime on its own thread.
///
/// The socket thread only moves byte frames; decoding and state changes happen
/// on the thread that owns the `Connection`.
pub struct Connection {
    outbound: mpsc::UnboundedSender<Outbound>,
    inbound: mpsc::UnboundedReceiver<Vec<u8>>,
    worker: Option<thread::JoinHandle<()>>,
    open: bool,
}

impl Connection {
    /// Connects and starts the socket thread. Must not be called from inside a tokio runtime.
    pub fn open(url: &str, fake_ping_ms: u64) -> Result<Self, Box<dyn std::error::Error>> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        info!("Connecting to {}", url);
        let (socket, _) = runtime.block_on(connect_async(url))?;
        info!("Connected to {}", url);
        if fake_ping_ms > 0 {
            info!("Simulating {}ms latency", fake_ping_ms);
        }

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();

        let worker = thread::Builder::new()
            .name("connection".to_string())
            .spawn(move || {
                runtime.block_on(run_socket(socket, outbound_rx, inbound_tx, fake_ping_ms));
            })?;

        Ok(Connection {
            outbound: outbound_tx,
            inbound: inbound_rx,
            worker: Some(worker),
            open: true,
        })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Queues a frame for the server. Frames sent after the socket closed are dropped.
    pub fn send(&mut self, frame: Vec<u8>) {
        if self.outbound.send(Outbound::Frame(frame)).is_err() {
            warn!("Connection closed, dropping outbound frame");
            self.open = false;
        }
    }

    /// Next inbound frame, without blocking
    pub fn try_recv(&mut self) -> Option<Vec<u8>> {
        match self.inbound.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.open {
                    warn!("Connection to server lost");
                    self.open = false;
                }
                None
            }
        }
    }

    /// Sends a close frame and waits for the socket thread to finish
    pub fn close(mut self) {
        let _ = self.outbound.send(Outbound::Close);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("Connection thread panicked");
            }
        }
        info!("Connection closed");
    }
}

/// FIFO that holds each frame for a fixed delay before releasing it
struct DelayLine {
    delay: Duration,
    queue: VecDeque<(Instant, Vec<u8>)>,
}

impl DelayLine {
    fn new(delay: Duration) -> Self {
        DelayLine {
            delay,
            queue: VecDeque::new(),
        }
    }

    fn push(&mut self, frame: Vec<u8>, now: Instant) {
        self.queue.push_back((now + self.delay, frame));
    }

    /// When the oldest held frame becomes due
    fn next_due(&self) -> Option<Instant> {
        self.queue.front().map(|(due, _)| *due)
    }

    /// Removes every frame due at `now`, oldest first
    fn pop_due(&mut self, now: Instant) -> Vec<Vec<u8>> {
        let mut ready = Vec::new();
        while self.next_due().is_some_and(|due| due <= now) {
            if let Some((_, frame)) = self.queue.pop_front() {
                ready.push(frame);
            }
        }
        ready
    }
}

/// Deadline for a select branch that is disabled while its line is empty
fn wake_at(line: &DelayLine) -> Instant {
    line.next_due()
        .unwrap_or_else(|| Instant::now() + Duration::from_secs(3600))
}

async fn run_socket(
    socket: Socket,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    inbound: mpsc::UnboundedSender<Vec<u8>>,
    fake_ping_ms: u64,
) {
    let (mut sink, mut stream) = socket.split();
    let delay = Duration::from_millis(fake_ping_ms / 2);
    let mut incoming = DelayLine::new(delay);
    let mut outgoing = DelayLine::new(delay);

    loop {
        let incoming_held = incoming.next_due().is_some();
        let outgoing_held = outgoing.next_due().is_some();

        tokio::select! {
            message = stream.next() => match message {
                Some(Ok(Message::Binary(data))) => {
                    incoming.push(data, Instant::now());
                    if delay.is_zero() && !deliver(&mut incoming, &inbound) {
                        break;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    info!("Server closed the connection: {:?}", frame);
                    break;
                }
                Some(Ok(other)) => debug!("Ignoring non-binary message: {:?}", other),
                Some(Err(e)) => {
                    error!("Error receiving frame: {}", e);
                    break;
                }
                None => {
                    info!("Server stream ended");
                    break;
                }
            },

            command = outbound.recv() => match command {
                Some(Outbound::Frame(frame)) => {
                    outgoing.push(frame, Instant::now());
                    if delay.is_zero() && !transmit(&mut outgoing, &mut sink).await {
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    let _ = sink.send(Message::Close(None)).await;
                    break;
                }
            },

            _ = sleep_until(wake_at(&incoming)), if incoming_held => {
                if !deliver(&mut incoming, &inbound) {
                    break;
                }
            }

            _ = sleep_until(wake_at(&outgoing)), if outgoing_held => {
                if !transmit(&mut outgoing, &mut sink).await {
                    break;
                }
            }
        }
    }
}

/// Hands due inbound frames to the event loop; false once nobody is listening
fn deliver(line: &mut DelayLine, inbound: &mpsc::UnboundedSender<Vec<u8>>) -> bool {
    line.pop_due(Instant::now())
        .into_iter()
        .all(|frame| inbound.send(frame).is_ok())
}

/// Writes due outbound frames to the socket; false on a send error
async fn transmit(line: &mut DelayLine, sink: &mut SplitSink<Socket, Message>) -> bool {
    for frame in line.pop_due(Instant::now()) {
        if let Err(e) = sink.send(Message::Binary(frame)).await {
            error!("Error sending frame: {}", e);
            return false;
        }
    }
    true
}

/// Counters for everything that arrived over the socket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub applied: u64,
    pub ignored: u64,
    pub malformed: u64,
    pub intents_sent: u64,
}

/// Owns the match state and routes frames and input between it, the renderer and the socket
pub struct Client {
    connection: Connection,
    game_state: GameState,
    input: InputDispatcher,
    renderer: RenderPipeline,
    canvas: Canvas,
    stats: FrameStats,
}

impl Client {
    /// Builds the model for a `width` x `height` playfield and paints the lobby view
    pub fn new(connection: Connection, width: u16, height: u16) -> Self {
        let game_state = GameState::new(i32::from(width), i32::from(height));
        let mut canvas = Canvas::new(width, height);
        let mut renderer = RenderPipeline::new();
        renderer.repaint(&mut canvas, &game_state);

        Client {
            connection,
            game_state,
            input: InputDispatcher::new(f32::from(height)),
            renderer,
            canvas,
            stats: FrameStats::default(),
        }
    }

    pub fn game_state(&self) -> &GameState {
        &self.game_state
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn renderer(&self) -> &RenderPipeline {
        &self.renderer
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_open()
    }

    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        self.input.set_viewport_height(viewport_height);
    }

    /// Decodes one frame and applies it in full before repainting
    pub fn handle_frame(&mut self, frame: &[u8]) {
        match decode(frame) {
            Ok(Some(event)) => {
                debug!("Received {:?}", event);
                self.stats.applied += 1;
                if self.game_state.apply_event(&event) {
                    self.renderer.repaint(&mut self.canvas, &self.game_state);
                }
            }
            Ok(None) => {
                self.stats.ignored += 1;
                debug!("Ignoring frame with directive {}", frame[0]);
            }
            Err(e) => {
                self.stats.malformed += 1;
                warn!("Dropping malformed frame: {}", e);
            }
        }
    }

    /// Handles every frame that has arrived since the last call, returns how many
    pub fn pump_network(&mut self) -> usize {
        let mut handled = 0;
        while let Some(frame) = self.connection.try_recv() {
            self.handle_frame(&frame);
            handled += 1;
        }
        handled
    }

    pub fn handle_input(&mut self, input: RawInput) {
        if let Some(intent) = self.input.map(input) {
            self.send_intent(intent);
        }
    }

    pub fn send_intent(&mut self, intent: Intent) {
        let frame = encode_intent(intent, self.game_state.player_id());
        debug!("Sending {:?} as player {}", intent, self.game_state.player_id());
        self.connection.send(frame.to_vec());
        self.stats.intents_sent += 1;
    }

    pub fn shutdown(self) {
        let stats = self.stats;
        info!(
            "Shutting down: {} events applied, {} ignored, {} malformed, {} intents sent, {} frames drawn",
            stats.applied,
            stats.ignored,
            stats.malformed,
            stats.intents_sent,
            self.renderer.frames_drawn()
        );
        self.connection.close();
    }
}
