use log::{info, warn};
use shared::{Positions, ServerEvent, BALL_SIZE, PADDLE_HEIGHT, PADDLE_WIDTH};

/// Player id value before the server has assigned one
pub const UNASSIGNED_PLAYER_ID: i32 = 0;

/// An axis-aligned rectangle on the play surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entity {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Entity {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn set_position(&mut self, (x, y): (i32, i32)) {
        self.x = x;
        self.y = y;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No game state has arrived yet, the server is still looking for an opponent
    #[default]
    AwaitingOpponent,
    InSession,
}

/// Last known state of the match as reported by the server
#[derive(Debug, Clone)]
pub struct GameState {
    pub paddles: [Entity; 2],
    pub ball: Entity,
    pub scores: [i32; 2],
    player_id: i32,
    phase: SessionPhase,
}

impl GameState {
    /// Lays out both paddles and the ball at their resting positions
    pub fn new(canvas_width: i32, canvas_height: i32) -> Self {
        let paddle_y = (canvas_height - PADDLE_HEIGHT) / 2;

        Self {
            paddles: [
                Entity::new(PADDLE_WIDTH, paddle_y, PADDLE_WIDTH, PADDLE_HEIGHT),
                Entity::new(
                    canvas_width - 2 * PADDLE_WIDTH,
                    paddle_y,
                    PADDLE_WIDTH,
                    PADDLE_HEIGHT,
                ),
            ],
            ball: Entity::new(
                (canvas_width - BALL_SIZE) / 2,
                (canvas_height - BALL_SIZE) / 2,
                BALL_SIZE,
                BALL_SIZE,
            ),
            scores: [0, 0],
            player_id: UNASSIGNED_PLAYER_ID,
            phase: SessionPhase::default(),
        }
    }

    pub fn player_id(&self) -> i32 {
        self.player_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Paddle A, paddle B and the ball, in paint order
    pub fn entities(&self) -> [&Entity; 3] {
        [&self.paddles[0], &self.paddles[1], &self.ball]
    }

    pub fn apply_identity(&mut self, player_id: i32) {
        if self.player_id != UNASSIGNED_PLAYER_ID && self.player_id != player_id {
            warn!(
                "Player id reassigned from {} to {}",
                self.player_id, player_id
            );
        } else {
            info!("Assigned player id {}", player_id);
        }
        self.player_id = player_id;
    }

    pub fn apply_positions(&mut self, positions: &Positions) {
        self.paddles[0].set_position(positions.paddle_a);
        self.paddles[1].set_position(positions.paddle_b);
        self.ball.set_position(positions.ball);

        if self.phase == SessionPhase::AwaitingOpponent {
            info!("Opponent found, match started");
            self.phase = SessionPhase::InSession;
        }
    }

    pub fn apply_scores(&mut self, scores: [i32; 2]) {
        self.scores = scores;
    }

    /// Applies a decoded server event in full.
    ///
    /// Returns true when the event changed something visible and the play
    /// surface has to be repainted.
    pub fn apply_event(&mut self, event: &ServerEvent) -> bool {
        match event {
            ServerEvent::IdentityAssigned { player_id } => {
                self.apply_identity(*player_id);
                false
            }
            ServerEvent::StateUpdate(positions) => {
                self.apply_positions(positions);
                true
            }
            ServerEvent::ScoreUpdate { scores } => {
                self.apply_scores(*scores);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{CANVAS_HEIGHT, CANVAS_WIDTH};

    fn sample_positions() -> Positions {
        Positions {
            paddle_a: (10, 20),
            paddle_b: (200, 20),
            ball: (100, 100),
        }
    }

    #[test]
    fn test_initial_layout() {
        let state = GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT);

        assert_eq!(state.paddles[0], Entity::new(20, 150, 20, 100));
        assert_eq!(state.paddles[1], Entity::new(560, 150, 20, 100));
        assert_eq!(state.ball, Entity::new(290, 190, 20, 20));
        assert_eq!(state.scores, [0, 0]);
        assert_eq!(state.player_id(), UNASSIGNED_PLAYER_ID);
        assert_eq!(state.phase(), SessionPhase::AwaitingOpponent);
    }

    #[test]
    fn test_state_update_moves_entities_only() {
        let mut state = GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT);

        let repaint = state.apply_event(&ServerEvent::StateUpdate(sample_positions()));

        assert!(repaint);
        assert_eq!(state.paddles[0], Entity::new(10, 20, 20, 100));
        assert_eq!(state.paddles[1], Entity::new(200, 20, 20, 100));
        assert_eq!(state.ball, Entity::new(100, 100, 20, 20));
        assert_eq!(state.scores, [0, 0]);
        assert_eq!(state.player_id(), UNASSIGNED_PLAYER_ID);
    }

    #[test]
    fn test_first_state_update_starts_session() {
        let mut state = GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT);

        state.apply_event(&ServerEvent::ScoreUpdate { scores: [1, 0] });
        assert_eq!(state.phase(), SessionPhase::AwaitingOpponent);

        state.apply_event(&ServerEvent::StateUpdate(sample_positions()));
        assert_eq!(state.phase(), SessionPhase::InSession);

        state.apply_event(&ServerEvent::StateUpdate(Positions::default()));
        assert_eq!(state.phase(), SessionPhase::InSession);
    }

    #[test]
    fn test_identity_does_not_request_repaint() {
        let mut state = GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT);

        let repaint = state.apply_event(&ServerEvent::IdentityAssigned { player_id: 42 });

        assert!(!repaint);
        assert_eq!(state.player_id(), 42);
    }

    #[test]
    fn test_identity_overwritten() {
        let mut state = GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        state.apply_identity(7);
        state.apply_identity(8);
        assert_eq!(state.player_id(), 8);
    }

    #[test]
    fn test_score_update() {
        let mut state = GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        let before = state.entities().map(|e| *e);

        let repaint = state.apply_event(&ServerEvent::ScoreUpdate { scores: [10, 5] });

        assert!(repaint);
        assert_eq!(state.scores, [10, 5]);
        assert_eq!(state.entities().map(|e| *e), before);
    }

    #[test]
    fn test_off_canvas_positions_accepted() {
        let mut state = GameState::new(CANVAS_WIDTH, CANVAS_HEIGHT);
        state.apply_positions(&Positions {
            paddle_a: (-50, -50),
            paddle_b: (10_000, 10_000),
            ball: (-1, 401),
        });

        assert_eq!((state.paddles[0].x, state.paddles[0].y), (-50, -50));
        assert_eq!((state.paddles[1].x, state.paddles[1].y), (10_000, 10_000));
        assert_eq!((state.ball.x, state.ball.y), (-1, 401));
    }
}
