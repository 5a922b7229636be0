//! N×N board, always projected from a move history.

use super::action::Move;
use super::error::InvalidMove;
use super::types::{Cell, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Row-major N×N grid of cells.
///
/// Boards are views, not state: callers rebuild them from the move
/// history with [`Board::project`] whenever they need the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an all-empty board of side `size`.
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Builds a board from raw cells in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if `cells.len()` is not `size * size`.
    #[instrument(skip(cells), fields(len = cells.len()))]
    pub fn from_cells(size: usize, cells: Vec<Cell>) -> Result<Self, InvalidMove> {
        if size.checked_mul(size) != Some(cells.len()) {
            return Err(InvalidMove::new(format!(
                "Expected a {}x{} board, got {} cells",
                size,
                size,
                cells.len()
            )));
        }
        Ok(Self { size, cells })
    }

    /// Replays `history` onto an empty board.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] if two moves share a cell or a move lies off
    /// the board. Validated histories never trigger this.
    #[instrument(skip(history), fields(moves = history.len()))]
    pub fn project(size: usize, history: &[Move]) -> Result<Self, InvalidMove> {
        let mut board = Self::empty(size);
        for mv in history {
            board.place(mv)?;
        }
        debug!(size, moves = history.len(), "Board projected");
        Ok(board)
    }

    /// Replays only the first `step` moves of `history`.
    ///
    /// Steps past the end of the history project the whole history.
    ///
    /// # Errors
    ///
    /// Same as [`Board::project`].
    #[instrument(skip(history), fields(moves = history.len()))]
    pub fn project_prefix(size: usize, history: &[Move], step: usize) -> Result<Self, InvalidMove> {
        let end = step.min(history.len());
        Self::project(size, &history[..end])
    }

    /// Index of the move that produced the board at `step`, if any.
    pub fn last_index(history: &[Move], step: usize) -> Option<usize> {
        step.checked_sub(1)
            .and_then(|i| history.get(i))
            .map(Move::board_index)
    }

    fn place(&mut self, mv: &Move) -> Result<(), InvalidMove> {
        let index = mv.board_index();
        match self.cells.get_mut(index) {
            None => Err(InvalidMove::new(format!(
                "Move {} targets index {} outside a board of {} cells",
                mv.turn(),
                index,
                self.size * self.size
            ))),
            Some(Cell::Occupied(previous)) => Err(InvalidMove::new(format!(
                "Move {} targets index {} already held by {}",
                mv.turn(),
                index,
                previous
            ))),
            Some(cell) => {
                *cell = Cell::Occupied(mv.player());
                Ok(())
            }
        }
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Gets the cell at `index`, or `None` off the board.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Checks if a cell is on the board and empty.
    pub fn is_empty(&self, index: usize) -> bool {
        matches!(self.get(index), Some(Cell::Empty))
    }

    /// Checks if every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Indices of empty cells in ascending order.
    pub fn empty_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Empty)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns a copy of the board with `player` marked at `index`.
    ///
    /// Off-board indices leave the copy unchanged.
    pub fn with_mark(&self, index: usize, player: Player) -> Self {
        let mut next = self.clone();
        if let Some(cell) = next.cells.get_mut(index) {
            *cell = Cell::Occupied(player);
        }
        next
    }

    /// Cell indices grouped by row.
    pub fn rows(&self) -> Vec<Vec<usize>> {
        (0..self.size)
            .map(|r| (0..self.size).map(|c| r * self.size + c).collect())
            .collect()
    }

    /// Formats the board as a human-readable grid.
    pub fn display(&self) -> String {
        self.rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&i| match self.get(i) {
                        Some(Cell::Occupied(player)) => player.to_string(),
                        _ => ".".to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Wire shape of [`Board`] before the length check.
#[derive(Deserialize)]
struct RawBoard {
    size: usize,
    cells: Vec<Cell>,
}

impl TryFrom<RawBoard> for Board {
    type Error = InvalidMove;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        Board::from_cells(raw.size, raw.cells)
    }
}
