//! Core domain types for N×N tic-tac-toe.

use serde::{Deserialize, Serialize};

/// Player mark.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
pub enum Player {
    /// Player X.
    X,
    /// Player O.
    O,
}

impl Player {
    /// Returns the opponent player.
    pub fn opponent(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a player's mark.
    Occupied(Player),
}

impl Cell {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Occupied(player) => Some(player),
        }
    }
}

/// Outcome of a game, always recomputed from the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Game is ongoing.
    InProgress,
    /// A player completed a full line.
    Win(Player),
    /// Board is full with no winner.
    Draw,
}

impl GameOutcome {
    /// Returns true once no further moves may be played.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }

    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameOutcome::Win(player) => Some(*player),
            GameOutcome::InProgress | GameOutcome::Draw => None,
        }
    }

    /// Converts a terminal outcome into its persisted result.
    pub fn result(&self) -> Option<GameResult> {
        match self {
            GameOutcome::InProgress => None,
            GameOutcome::Win(player) => Some(GameResult::Winner(*player)),
            GameOutcome::Draw => Some(GameResult::Draw),
        }
    }
}

impl std::fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameOutcome::InProgress => write!(f, "In progress"),
            GameOutcome::Win(player) => write!(f, "Player {} wins", player),
            GameOutcome::Draw => write!(f, "Draw"),
        }
    }
}

/// Result of a finished game as stored by callers (`"X"`, `"O"` or `"draw"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum GameResult {
    /// Player won the game.
    Winner(Player),
    /// Game ended in a draw.
    Draw,
}

impl GameResult {
    /// Returns the winner if there is one.
    pub fn winner(&self) -> Option<Player> {
        match self {
            GameResult::Winner(player) => Some(*player),
            GameResult::Draw => None,
        }
    }
}

impl From<GameResult> for GameOutcome {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::Winner(player) => GameOutcome::Win(player),
            GameResult::Draw => GameOutcome::Draw,
        }
    }
}

impl From<GameResult> for String {
    fn from(result: GameResult) -> Self {
        match result {
            GameResult::Winner(player) => player.to_string(),
            GameResult::Draw => "draw".to_string(),
        }
    }
}

impl TryFrom<String> for GameResult {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "draw" => Ok(GameResult::Draw),
            other => other
                .parse::<Player>()
                .map(GameResult::Winner)
                .map_err(|_| format!("Invalid result: {}", other)),
        }
    }
}
