//! Moves as recorded in history and as submitted by callers.

use super::types::Player;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A recorded move: the `turn`-th mark placed in the game.
///
/// Immutable once recorded. Timestamps are the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct Move {
    /// 1-based turn number.
    turn: u32,
    /// Player who placed the mark.
    player: Player,
    /// Row-major cell index.
    #[serde(rename = "index")]
    board_index: usize,
}

impl Move {
    /// Returns the 1-based turn number.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Returns the player who placed the mark.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the cell index.
    pub fn board_index(&self) -> usize {
        self.board_index
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {} -> {}", self.turn, self.player, self.board_index)
    }
}

/// A candidate move `{boardIndex, player}` submitted for validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, new)]
pub struct MoveRequest {
    /// Player claiming the move.
    player: Player,
    /// Row-major cell index.
    #[serde(rename = "index")]
    board_index: usize,
}

impl MoveRequest {
    /// Returns the player claiming the move.
    pub fn player(&self) -> Player {
        self.player
    }

    /// Returns the cell index.
    pub fn board_index(&self) -> usize {
        self.board_index
    }
}
