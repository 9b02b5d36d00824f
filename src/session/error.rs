//! Session errors.

use thiserror::Error;

use super::SessionId;
use crate::core::Stone;

/// Why a session operation was rejected.
///
/// Every rejection leaves the session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("cell {0} is already occupied")]
    CellOccupied(String),

    #[error("not your turn; {expected} to move")]
    OutOfTurn { expected: Stone },

    #[error("you play {seat}, not {requested}")]
    WrongColor { seat: Stone, requested: Stone },

    #[error("the game has not started")]
    GameNotStarted,

    #[error("the game is already over")]
    GameAlreadyOver,

    #[error("the game is not over")]
    GameNotOver,

    #[error("room {0} is full")]
    SessionFull(SessionId),

    #[error("room {0} is locked")]
    SessionLocked(SessionId),

    #[error("not seated in room {0}")]
    NotSeated(SessionId),

    #[error("already seated in room {0}")]
    AlreadySeated(SessionId),

    #[error("no room {0}")]
    UnknownSession(SessionId),

    #[error("room {0} already exists")]
    SessionExists(SessionId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(SessionError::SessionFull(3).to_string(), "room 3 is full");
        assert_eq!(
            SessionError::OutOfTurn { expected: Stone::White }.to_string(),
            "not your turn; white to move"
        );
        assert_eq!(
            SessionError::WrongColor {
                seat: Stone::Black,
                requested: Stone::White
            }
            .to_string(),
            "you play black, not white"
        );
    }
}
