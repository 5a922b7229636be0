//! Error types for move validation, history projection and configuration.

use super::types::Player;
use derive_more::{Display, Error, From};
use tracing::instrument;

/// Corrupted move history.
///
/// Raised when a recorded history cannot be projected onto a board (two
/// moves on one cell, an index off the board) or breaks a history invariant.
/// This is never the submitter's fault and must not be retried.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid move history: {} at {}:{}", message, file, line)]
pub struct InvalidMove {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl InvalidMove {
    /// Creates a new history error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Reason a candidate move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum MoveError {
    /// The index lies outside the board.
    #[display("Index {} out of range (board has {} cells)", index, cells)]
    OutOfRange {
        /// Submitted index.
        index: usize,
        /// Number of cells on the board.
        cells: usize,
    },

    /// The game already has a winner or a full board.
    #[display("Game already finished")]
    GameAlreadyFinished,

    /// The target cell holds a mark.
    #[display("Cell {} is already occupied", _0)]
    CellOccupied(#[error(not(source))] usize),

    /// The submitted player is not the one expected to move.
    #[display("Not {}'s turn (expected {})", submitted, expected)]
    WrongTurn {
        /// Player that was submitted.
        submitted: Player,
        /// Player expected to move next.
        expected: Player,
    },

    /// The recorded history itself is corrupted.
    #[display("{}", _0)]
    #[from]
    InvalidMove(InvalidMove),
}

impl MoveError {
    /// Returns true if the submitter can correct the move and resubmit.
    ///
    /// `InvalidMove` is the only fatal kind.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MoveError::InvalidMove(_))
    }
}

/// Configuration error.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_tracks_location() {
        let err = InvalidMove::new("two moves on cell 4");
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().contains("two moves on cell 4"));
    }

    #[test]
    fn test_only_invalid_move_is_fatal() {
        assert!(MoveError::GameAlreadyFinished.is_recoverable());
        assert!(MoveError::CellOccupied(3).is_recoverable());
        let fatal: MoveError = InvalidMove::new("corrupt").into();
        assert!(!fatal.is_recoverable());
    }

    #[test]
    fn test_wrong_turn_message() {
        let err = MoveError::WrongTurn {
            submitted: Player::X,
            expected: Player::O,
        };
        assert_eq!(err.to_string(), "Not X's turn (expected O)");
    }
}
