//! One-ply opponent heuristic.
//!
//! Tiers are tried in order: win now, block the opponent's win, take the
//! center, otherwise pick any empty cell through an injected selector. There
//! is no deeper search, so forks and double threats go unseen.

use super::board::Board;
use super::rules::check_winner;
use super::types::Player;
use rand::Rng;
use tracing::{debug, instrument};

/// Chooses one of `len` fallback candidates by position.
///
/// Production code uses [`RandomPicker`]; tests pass a closure such as
/// `|_| 0` for a deterministic choice. Results past `len` wrap around.
pub trait PickIndex {
    /// Returns a position in `0..len`. Never called with `len == 0`.
    fn pick_index(&mut self, len: usize) -> usize;
}

impl<F> PickIndex for F
where
    F: FnMut(usize) -> usize,
{
    fn pick_index(&mut self, len: usize) -> usize {
        self(len)
    }
}

/// Uniform random selection backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RandomPicker<R> {
    rng: R,
}

impl<R: Rng> RandomPicker<R> {
    /// Wraps an RNG.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPicker<rand::rngs::ThreadRng> {
    /// Picker over the thread-local RNG.
    pub fn thread() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> PickIndex for RandomPicker<R> {
    fn pick_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Which rule produced the bot's move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum BotTier {
    /// Completes a line for the bot.
    Win,
    /// Occupies the cell that would complete the opponent's line.
    Block,
    /// Takes the center cell.
    Center,
    /// Injected selection among the empty cells.
    Fallback,
}

/// A chosen cell and the tier that chose it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BotChoice {
    /// Row-major cell index.
    pub index: usize,
    /// Rule that fired.
    pub tier: BotTier,
}

/// First empty cell (ascending) where `mark` would complete a line.
fn completing_cell(board: &Board, empties: &[usize], mark: Player) -> Option<usize> {
    empties
        .iter()
        .copied()
        .find(|&i| check_winner(&board.with_mark(i, mark)) == Some(mark))
}

/// Selects a move and reports which tier chose it.
///
/// Returns `None` only when the board has no empty cell.
#[instrument(skip(board, picker), fields(size = board.size()))]
pub fn select_move_with_tier(
    board: &Board,
    bot: Player,
    opponent: Player,
    picker: &mut impl PickIndex,
) -> Option<BotChoice> {
    let empties = board.empty_indices();
    if empties.is_empty() {
        debug!("No empty cell left");
        return None;
    }

    let choice = if let Some(index) = completing_cell(board, &empties, bot) {
        BotChoice {
            index,
            tier: BotTier::Win,
        }
    } else if let Some(index) = completing_cell(board, &empties, opponent) {
        BotChoice {
            index,
            tier: BotTier::Block,
        }
    } else {
        let center = board.cells().len() / 2;
        if board.is_empty(center) {
            BotChoice {
                index: center,
                tier: BotTier::Center,
            }
        } else {
            let pick = picker.pick_index(empties.len()) % empties.len();
            BotChoice {
                index: empties[pick],
                tier: BotTier::Fallback,
            }
        }
    };

    debug!(index = choice.index, tier = %choice.tier, "Bot chose move");
    Some(choice)
}

/// Selects a move for `bot` against `opponent`.
///
/// Returns `None` only when the board has no empty cell.
pub fn select_move(
    board: &Board,
    bot: Player,
    opponent: Player,
    picker: &mut impl PickIndex,
) -> Option<usize> {
    select_move_with_tier(board, bot, opponent, picker).map(|c| c.index)
}
