//! Directive-tagged binary messages exchanged with the game server
//!
//! Every message starts with a one byte directive followed by a fixed number of
//! big-endian `i32` fields. One WebSocket message carries exactly one protocol
//! message, so there is no length prefix.

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

/// Length of every client-originated message: directive + player id
pub const INTENT_FRAME_LEN: usize = 5;

const FIELD_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Directive {
    Identity = 0,
    GameState = 1,
    MovePlayerUp = 2,
    MovePlayerDown = 3,
    StopMovingPlayer = 4,
    GameScore = 5,
}

impl Directive {
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Directive::Identity),
            1 => Some(Directive::GameState),
            2 => Some(Directive::MovePlayerUp),
            3 => Some(Directive::MovePlayerDown),
            4 => Some(Directive::StopMovingPlayer),
            5 => Some(Directive::GameScore),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Number of `i32` fields following the directive byte
    pub fn field_count(self) -> usize {
        match self {
            Directive::GameState => 6,
            Directive::GameScore => 2,
            Directive::Identity
            | Directive::MovePlayerUp
            | Directive::MovePlayerDown
            | Directive::StopMovingPlayer => 1,
        }
    }

    /// Minimum number of bytes a message with this directive occupies
    pub fn frame_len(self) -> usize {
        1 + self.field_count() * FIELD_LEN
    }

    /// True for directives the server sends to clients
    pub fn is_inbound(self) -> bool {
        matches!(
            self,
            Directive::Identity | Directive::GameState | Directive::GameScore
        )
    }
}

/// Movement requests a player can send to the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveUp,
    MoveDown,
    StopMoving,
}

impl Intent {
    pub fn directive(self) -> Directive {
        match self {
            Intent::MoveUp => Directive::MovePlayerUp,
            Intent::MoveDown => Directive::MovePlayerDown,
            Intent::StopMoving => Directive::StopMovingPlayer,
        }
    }
}

/// Top-left corners of both paddles and the ball, in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Positions {
    pub paddle_a: (i32, i32),
    pub paddle_b: (i32, i32),
    pub ball: (i32, i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerEvent {
    IdentityAssigned { player_id: i32 },
    StateUpdate(Positions),
    ScoreUpdate { scores: [i32; 2] },
}

impl ServerEvent {
    pub fn directive(&self) -> Directive {
        match self {
            ServerEvent::IdentityAssigned { .. } => Directive::Identity,
            ServerEvent::StateUpdate(_) => Directive::GameState,
            ServerEvent::ScoreUpdate { .. } => Directive::GameScore,
        }
    }

    /// Serializes the event the way the game server puts it on the wire
    pub fn to_bytes(&self) -> Vec<u8> {
        let fields: Vec<i32> = match *self {
            ServerEvent::IdentityAssigned { player_id } => vec![player_id],
            ServerEvent::StateUpdate(p) => vec![
                p.paddle_a.0,
                p.paddle_a.1,
                p.paddle_b.0,
                p.paddle_b.1,
                p.ball.0,
                p.ball.1,
            ],
            ServerEvent::ScoreUpdate { scores } => scores.to_vec(),
        };

        let mut frame = vec![0u8; self.directive().frame_len()];
        frame[0] = self.directive().tag();
        BigEndian::write_i32_into(&fields, &mut frame[1..]);
        frame
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("empty frame")]
    Empty,
    #[error("truncated {directive:?} frame: expected {expected} bytes, got {actual}")]
    Truncated {
        directive: Directive,
        expected: usize,
        actual: usize,
    },
}

/// Decodes one inbound message.
///
/// Returns `Ok(None)` for directives a client never receives (unknown tags and
/// the outbound movement directives). Bytes past the directive's fixed length
/// are ignored.
pub fn decode(frame: &[u8]) -> Result<Option<ServerEvent>, DecodeError> {
    let tag = *frame.first().ok_or(DecodeError::Empty)?;

    let directive = match Directive::from_u8(tag) {
        Some(directive) if directive.is_inbound() => directive,
        _ => return Ok(None),
    };

    let expected = directive.frame_len();
    if frame.len() < expected {
        return Err(DecodeError::Truncated {
            directive,
            expected,
            actual: frame.len(),
        });
    }

    let field = |index: usize| {
        let start = 1 + index * FIELD_LEN;
        BigEndian::read_i32(&frame[start..start + FIELD_LEN])
    };

    let event = match directive {
        Directive::Identity => ServerEvent::IdentityAssigned {
            player_id: field(0),
        },
        Directive::GameState => ServerEvent::StateUpdate(Positions {
            paddle_a: (field(0), field(1)),
            paddle_b: (field(2), field(3)),
            ball: (field(4), field(5)),
        }),
        Directive::GameScore => ServerEvent::ScoreUpdate {
            scores: [field(0), field(1)],
        },
        Directive::MovePlayerUp | Directive::MovePlayerDown | Directive::StopMovingPlayer => {
            return Ok(None)
        }
    };

    Ok(Some(event))
}

/// Builds the fixed five byte message announcing a movement intent
pub fn encode_intent(intent: Intent, player_id: i32) -> [u8; INTENT_FRAME_LEN] {
    let mut frame = [0u8; INTENT_FRAME_LEN];
    frame[0] = intent.directive().tag();
    BigEndian::write_i32(&mut frame[1..], player_id);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_move_up() {
        assert_eq!(encode_intent(Intent::MoveUp, 42), [2, 0, 0, 0, 42]);
    }

    #[test]
    fn test_encode_uses_directive_tag_and_big_endian_id() {
        let cases = [
            (Intent::MoveUp, 2u8),
            (Intent::MoveDown, 3u8),
            (Intent::StopMoving, 4u8),
        ];

        for (intent, tag) in cases {
            let frame = encode_intent(intent, 0x0102_0304);
            assert_eq!(frame.len(), INTENT_FRAME_LEN);
            assert_eq!(frame[0], tag);
            assert_eq!(&frame[1..], &[1, 2, 3, 4]);
        }
    }

    #[test]
    fn test_encode_negative_id() {
        let frame = encode_intent(Intent::StopMoving, -1);
        assert_eq!(frame, [4, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_decode_identity() {
        let event = decode(&[0, 0, 0, 1, 0]).unwrap();
        assert_eq!(event, Some(ServerEvent::IdentityAssigned { player_id: 256 }));
    }

    #[test]
    fn test_decode_state_update() {
        let frame = [
            1, 0, 0, 0, 10, 0, 0, 0, 20, 0, 0, 0, 200, 0, 0, 0, 20, 0, 0, 0, 100, 0, 0, 0, 100,
        ];

        match decode(&frame).unwrap() {
            Some(ServerEvent::StateUpdate(positions)) => {
                assert_eq!(positions.paddle_a, (10, 20));
                assert_eq!(positions.paddle_b, (200, 20));
                assert_eq!(positions.ball, (100, 100));
            }
            other => panic!("Unexpected decode result: {:?}", other),
        }
    }

    #[test]
    fn test_decode_score_update() {
        let event = decode(&[5, 0, 0, 0, 10, 0, 0, 0, 5]).unwrap();
        assert_eq!(event, Some(ServerEvent::ScoreUpdate { scores: [10, 5] }));
    }

    #[test]
    fn test_decode_negative_coordinates() {
        let positions = Positions {
            paddle_a: (-5, 0),
            paddle_b: (0, -300),
            ball: (i32::MIN, i32::MAX),
        };
        let frame = ServerEvent::StateUpdate(positions).to_bytes();
        assert_eq!(
            decode(&frame).unwrap(),
            Some(ServerEvent::StateUpdate(positions))
        );
    }

    #[test]
    fn test_decode_ignores_unknown_directives() {
        for tag in 6..=u8::MAX {
            assert_eq!(decode(&[tag, 0, 0, 0, 1]), Ok(None), "tag {}", tag);
        }
    }

    #[test]
    fn test_decode_ignores_outbound_directives() {
        for intent in [Intent::MoveUp, Intent::MoveDown, Intent::StopMoving] {
            assert_eq!(decode(&encode_intent(intent, 7)), Ok(None));
        }
    }

    #[test]
    fn test_decode_empty_frame() {
        assert_eq!(decode(&[]), Err(DecodeError::Empty));
    }

    #[test]
    fn test_decode_truncated_frames() {
        assert_eq!(
            decode(&[0, 0, 0]),
            Err(DecodeError::Truncated {
                directive: Directive::Identity,
                expected: 5,
                actual: 3,
            })
        );
        assert_eq!(
            decode(&[1, 0, 0, 0, 10]),
            Err(DecodeError::Truncated {
                directive: Directive::GameState,
                expected: 25,
                actual: 5,
            })
        );
        assert!(matches!(
            decode(&[5]),
            Err(DecodeError::Truncated {
                directive: Directive::GameScore,
                ..
            })
        ));
    }

    #[test]
    fn test_decode_ignores_trailing_padding() {
        // The game server allocates 6 bytes for identity and 49 for state messages
        let mut identity = ServerEvent::IdentityAssigned { player_id: 9 }.to_bytes();
        identity.push(0);
        assert_eq!(
            decode(&identity).unwrap(),
            Some(ServerEvent::IdentityAssigned { player_id: 9 })
        );

        let positions = Positions {
            paddle_a: (20, 150),
            paddle_b: (560, 150),
            ball: (290, 190),
        };
        let mut state = ServerEvent::StateUpdate(positions).to_bytes();
        state.resize(49, 0);
        assert_eq!(
            decode(&state).unwrap(),
            Some(ServerEvent::StateUpdate(positions))
        );
    }

    #[test]
    fn test_frame_lengths() {
        assert_eq!(Directive::Identity.frame_len(), 5);
        assert_eq!(Directive::GameState.frame_len(), 25);
        assert_eq!(Directive::GameScore.frame_len(), 9);
        assert_eq!(Directive::MovePlayerUp.frame_len(), INTENT_FRAME_LEN);
    }

    #[test]
    fn test_directive_tags() {
        for tag in 0..=5u8 {
            let directive = Directive::from_u8(tag).unwrap();
            assert_eq!(directive.tag(), tag);
        }
        assert_eq!(Directive::from_u8(6), None);
    }

    #[test]
    fn test_decode_error_messages() {
        let err = DecodeError::Truncated {
            directive: Directive::GameScore,
            expected: 9,
            actual: 4,
        };
        assert_eq!(
            err.to_string(),
            "truncated GameScore frame: expected 9 bytes, got 4"
        );
        assert_eq!(DecodeError::Empty.to_string(), "empty frame");
    }
}
