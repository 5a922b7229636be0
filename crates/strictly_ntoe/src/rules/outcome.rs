//! Terminal-state evaluation.

use super::super::{Board, GameOutcome};
use super::{check_winner, is_full};
use tracing::{debug, instrument};

/// Computes the outcome of a board.
///
/// A completed line wins; otherwise a full board is a draw; otherwise the
/// game is in progress. Total over any board, including ones no legal game
/// could reach.
#[instrument(skip(board), fields(size = board.size()))]
pub fn evaluate(board: &Board) -> GameOutcome {
    let outcome = if let Some(winner) = check_winner(board) {
        GameOutcome::Win(winner)
    } else if is_full(board) {
        GameOutcome::Draw
    } else {
        GameOutcome::InProgress
    };
    debug!(%outcome, "Board evaluated");
    outcome
}
