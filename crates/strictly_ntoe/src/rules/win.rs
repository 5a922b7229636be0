//! Win detection for boards of any size.
//!
//! Only a full line counts: a row, a column, or one of the two long
//! diagonals, each `size` cells long. There is no shorter run-length rule
//! on bigger boards.

use super::super::{Board, Cell, Player};
use tracing::{debug, instrument};

/// Which kind of line produced a win.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Line {
    /// Row `r` (0-based).
    Row(usize),
    /// Column `c` (0-based).
    Column(usize),
    /// Top-left to bottom-right.
    MainDiagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Line {
    /// Cell indices along this line on a board of side `size`.
    pub fn indices(self, size: usize) -> Vec<usize> {
        match self {
            Line::Row(r) => (0..size).map(|c| r * size + c).collect(),
            Line::Column(c) => (0..size).map(|r| r * size + c).collect(),
            Line::MainDiagonal => (0..size).map(|i| i * size + i).collect(),
            Line::AntiDiagonal => (0..size).map(|i| i * size + (size - 1 - i)).collect(),
        }
    }
}

/// Every line on a board of side `size`, in evaluation order.
///
/// Rows first, then columns, then the main and anti diagonals.
pub fn lines(size: usize) -> impl Iterator<Item = Line> {
    (0..size)
        .map(Line::Row)
        .chain((0..size).map(Line::Column))
        .chain([Line::MainDiagonal, Line::AntiDiagonal])
}

/// Returns the mark filling `line`, if one mark fills all of it.
fn line_owner(board: &Board, line: Line) -> Option<Player> {
    let mut cells = line.indices(board.size()).into_iter().map(|i| board.get(i));
    let first = cells.next()??.mark()?;
    cells
        .all(|c| c == Some(Cell::Occupied(first)))
        .then_some(first)
}

/// Finds the first completed line and its owner.
#[instrument(skip(board), fields(size = board.size()))]
pub fn winning_line(board: &Board) -> Option<(Line, Player)> {
    if board.size() == 0 {
        return None;
    }
    let found = lines(board.size()).find_map(|line| line_owner(board, line).map(|p| (line, p)));
    if let Some((line, player)) = found {
        debug!(?line, %player, "Winning line found");
    }
    found
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player fills a row, column or long
/// diagonal, `None` otherwise.
pub fn check_winner(board: &Board) -> Option<Player> {
    winning_line(board).map(|(_, player)| player)
}
