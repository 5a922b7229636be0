//! Session error types.

use super::record::GameId;
use derive_more::{Display, Error, From};
use strictly_ntoe::{ConfigError, InvalidMove, MoveError, Player};

/// Error raised by the game registry.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum SessionError {
    /// No game with this id.
    #[display("Game {} not found", _0)]
    NotFound(#[error(not(source))] GameId),

    /// The rules rejected the move; nothing was appended.
    #[display("Move rejected: {}", _0)]
    #[from]
    Rejected(MoveError),

    /// Another append landed between validation and the conditional update.
    #[display("Stale history: expected {} moves, found {}", expected, actual)]
    StaleHistory {
        /// History length the append was conditioned on.
        expected: usize,
        /// History length actually stored.
        actual: usize,
    },

    /// A game with this id is already registered.
    #[display("Game {} already exists", _0)]
    AlreadyExists(#[error(not(source))] GameId),

    /// The game already has a recorded result.
    #[display("Game {} already has a result", _0)]
    AlreadyFinished(#[error(not(source))] GameId),

    /// A result was requested for a game still in progress.
    #[display("Game {} is still in progress", _0)]
    NotFinished(#[error(not(source))] GameId),

    /// The bot was asked to move out of turn.
    #[display("Not {}'s turn (expected {})", bot, expected)]
    NotBotsTurn {
        /// Mark the bot plays.
        bot: Player,
        /// Mark expected to move.
        expected: Player,
    },

    /// The board has no empty cell left for the bot.
    #[display("No move available for game {}", _0)]
    NoMoveAvailable(#[error(not(source))] GameId),

    /// The requested game configuration was refused.
    #[display("Invalid game config: {}", _0)]
    #[from]
    InvalidConfig(ConfigError),

    /// The stored history is corrupted.
    #[display("Corrupted history: {}", _0)]
    #[from]
    Corrupted(InvalidMove),
}

impl SessionError {
    /// Returns true if retrying, or correcting the request, can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            SessionError::Rejected(e) => e.is_recoverable(),
            SessionError::Corrupted(_) => false,
            _ => true,
        }
    }
}
