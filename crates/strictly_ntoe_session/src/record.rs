//! Stored game documents.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strictly_ntoe::{Board, GameConfig, GameOutcome, GameResult, InvalidMove, Move, Player};
use tracing::instrument;

/// Identifier of a stored game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct GameId(pub u64);

/// A move together with the time it was appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedMove {
    /// The validated move.
    #[serde(flatten)]
    #[getter(skip)]
    mv: Move,
    /// Append time.
    created_at: DateTime<Utc>,
}

impl RecordedMove {
    /// Stamps a move with the current time.
    pub fn now(mv: Move) -> Self {
        Self {
            mv,
            created_at: Utc::now(),
        }
    }

    /// Returns the recorded move.
    pub fn mv(&self) -> Move {
        self.mv
    }
}

/// A stored game: config, move history and, once finished, the result.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Game id.
    id: GameId,
    /// Board size and first player.
    #[serde(flatten)]
    config: GameConfig,
    /// Creation time.
    created_at: DateTime<Utc>,
    /// Time the result was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
    /// Recorded result, `"X"`, `"O"` or `"draw"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<GameResult>,
    /// Winner, absent for draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winner: Option<Player>,
    /// Append-only move history.
    moves: Vec<RecordedMove>,
}

impl GameRecord {
    /// Creates an empty game.
    pub(crate) fn new(id: GameId, config: GameConfig) -> Self {
        Self {
            id,
            config,
            created_at: Utc::now(),
            finished_at: None,
            result: None,
            winner: None,
            moves: Vec::new(),
        }
    }

    /// The move history without timestamps, as the rules consume it.
    pub fn history(&self) -> Vec<Move> {
        self.moves.iter().map(RecordedMove::mv).collect()
    }

    /// Projects the current board.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if the stored history is corrupted.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn board(&self) -> Result<Board, InvalidMove> {
        Board::project(self.config.size(), &self.history())
    }

    /// Recomputes the outcome from the history.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if the stored history is corrupted.
    pub fn outcome(&self) -> Result<GameOutcome, InvalidMove> {
        self.board().map(|b| strictly_ntoe::evaluate(&b))
    }

    pub(crate) fn push(&mut self, mv: RecordedMove) {
        self.moves.push(mv);
    }

    pub(crate) fn finish(&mut self, result: GameResult) {
        self.result = Some(result);
        self.winner = result.winner();
        self.finished_at = Some(Utc::now());
    }

    /// Summary used by recent-game listings.
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            id: self.id,
            config: self.config,
            created_at: self.created_at,
            finished_at: self.finished_at,
            result: self.result,
            winner: self.winner,
            move_count: self.moves.len(),
        }
    }
}

/// Listing entry for a stored game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSummary {
    /// Game id.
    id: GameId,
    /// Board size and first player.
    #[serde(flatten)]
    config: GameConfig,
    /// Creation time.
    created_at: DateTime<Utc>,
    /// Time the result was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished_at: Option<DateTime<Utc>>,
    /// Recorded result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<GameResult>,
    /// Winner, absent for draws.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winner: Option<Player>,
    /// Number of recorded moves.
    move_count: usize,
}

/// Board view at one step of a replay.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct ReplayFrame {
    /// Number of moves applied.
    step: usize,
    /// Board after `step` moves.
    board: Board,
    /// Index of the move applied last, for highlighting.
    last_index: Option<usize>,
}

impl ReplayFrame {
    pub(crate) fn new(step: usize, board: Board, last_index: Option<usize>) -> Self {
        Self {
            step,
            board,
            last_index,
        }
    }
}
