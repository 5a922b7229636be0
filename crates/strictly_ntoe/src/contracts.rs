//! Move legality checks.
//!
//! Each precondition is its own check over a [`Snapshot`] of the game.
//! [`LegalMove`] runs them in a fixed order and stops at the first failure,
//! so a rejection always names the earliest rule the move breaks.

use super::action::{Move, MoveRequest};
use super::board::Board;
use super::config::GameConfig;
use super::error::MoveError;
use super::rules::evaluate;
use super::types::{GameOutcome, Player};
use tracing::{debug, instrument, warn};

/// Read-only view of a game: config, history and the board projected from it.
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    config: &'a GameConfig,
    history: &'a [Move],
    board: Board,
    outcome: GameOutcome,
}

impl<'a> Snapshot<'a> {
    /// Projects `history` and evaluates it.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidMove`] if the history cannot be projected.
    #[instrument(skip(config, history), fields(size = config.size(), moves = history.len()))]
    pub fn new(config: &'a GameConfig, history: &'a [Move]) -> Result<Self, MoveError> {
        let board = Board::project(config.size(), history)?;
        let outcome = evaluate(&board);
        Ok(Self {
            config,
            history,
            board,
            outcome,
        })
    }

    /// Returns the game configuration.
    pub fn config(&self) -> &GameConfig {
        self.config
    }

    /// Returns the move history.
    pub fn history(&self) -> &[Move] {
        self.history
    }

    /// Returns the projected board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current outcome.
    pub fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Player expected to move next.
    pub fn to_move(&self) -> Player {
        self.config.expected_player(self.history.len())
    }
}

/// Precondition: the index lies on the board.
pub struct IndexInRange;

impl IndexInRange {
    /// Checks the index against the configured board size.
    pub fn check(request: &MoveRequest, config: &GameConfig) -> Result<(), MoveError> {
        let cells = config.cell_count();
        if request.board_index() < cells {
            Ok(())
        } else {
            Err(MoveError::OutOfRange {
                index: request.board_index(),
                cells,
            })
        }
    }
}

/// Precondition: the game has no winner and a free cell.
pub struct GameNotFinished;

impl GameNotFinished {
    /// Checks the snapshot's outcome.
    pub fn check(snapshot: &Snapshot<'_>) -> Result<(), MoveError> {
        if snapshot.outcome().is_terminal() {
            Err(MoveError::GameAlreadyFinished)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the target cell is empty.
pub struct CellIsEmpty;

impl CellIsEmpty {
    /// Checks the target cell on the projected board.
    pub fn check(request: &MoveRequest, snapshot: &Snapshot<'_>) -> Result<(), MoveError> {
        if snapshot.board().is_empty(request.board_index()) {
            Ok(())
        } else {
            Err(MoveError::CellOccupied(request.board_index()))
        }
    }
}

/// Precondition: the submitted player is the one expected to move.
pub struct PlayersTurn;

impl PlayersTurn {
    /// Checks the player against the alternation from the first player.
    pub fn check(request: &MoveRequest, snapshot: &Snapshot<'_>) -> Result<(), MoveError> {
        let expected = snapshot.to_move();
        if request.player() == expected {
            Ok(())
        } else {
            Err(MoveError::WrongTurn {
                submitted: request.player(),
                expected,
            })
        }
    }
}

/// Composite precondition: range, then game state, then occupancy, then turn.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(history), fields(size = config.size(), moves = history.len()))]
    pub fn check(
        history: &[Move],
        config: &GameConfig,
        request: &MoveRequest,
    ) -> Result<(), MoveError> {
        IndexInRange::check(request, config)?;
        let snapshot = Snapshot::new(config, history)?;
        GameNotFinished::check(&snapshot)?;
        CellIsEmpty::check(request, &snapshot)?;
        PlayersTurn::check(request, &snapshot)?;
        Ok(())
    }
}

/// Checks whether `request` may be appended to `history`.
///
/// Advisory only: nothing is mutated, so repeated calls with the same
/// inputs give the same answer.
///
/// # Errors
///
/// Returns the first failed precondition, or [`MoveError::InvalidMove`] if
/// `history` itself is corrupted.
pub fn validate(
    history: &[Move],
    config: &GameConfig,
    request: &MoveRequest,
) -> Result<(), MoveError> {
    LegalMove::check(history, config, request).inspect_err(|e| {
        if e.is_recoverable() {
            warn!(error = %e, "Move rejected");
        } else {
            warn!(error = %e, "Move history corrupted");
        }
    })
}

/// Validates `request` and builds the move the caller should append.
///
/// The returned move has `turn = history.len() + 1`.
///
/// # Errors
///
/// Same as [`validate`].
#[instrument(skip(history), fields(size = config.size(), moves = history.len()))]
pub fn next_move(
    history: &[Move],
    config: &GameConfig,
    request: &MoveRequest,
) -> Result<Move, MoveError> {
    validate(history, config, request)?;
    let turn = u32::try_from(history.len() + 1).map_err(|_| MoveError::GameAlreadyFinished)?;
    let mv = Move::new(turn, request.player(), request.board_index());
    debug!(%mv, "Move accepted");
    Ok(mv)
}
