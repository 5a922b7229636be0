//! Strictly N-toe - rules for N×N tic-tac-toe
//!
//! Every operation here is a pure function of its inputs. A game is its
//! move history: boards are projected from it on demand, outcomes are
//! recomputed from boards, and moves are validated against it before a
//! caller appends them.
//!
//! # Architecture
//!
//! - **Board**: row-major grid projected from a move history
//! - **Rules**: full-line win detection for any board size, draw detection
//! - **Contracts**: ordered legality checks for a candidate move
//! - **Invariants**: consistency checks for loaded histories
//! - **Bot**: one-ply heuristic with an injected fallback selector
//!
//! # Example
//!
//! ```
//! use strictly_ntoe::{Board, GameConfig, GameOutcome, Move, MoveRequest, Player, evaluate, next_move};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GameConfig::new(3, Player::X)?;
//! let mut history: Vec<Move> = Vec::new();
//! for (player, index) in [(Player::X, 0), (Player::O, 4), (Player::X, 1)] {
//!     let mv = next_move(&history, &config, &MoveRequest::new(player, index))?;
//!     history.push(mv);
//! }
//! let board = Board::project(config.size(), &history)?;
//! assert_eq!(evaluate(&board), GameOutcome::InProgress);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod board;
mod bot;
mod config;
mod contracts;
mod error;
mod invariants;
mod rules;
mod types;

pub use action::{Move, MoveRequest};
pub use board::Board;
pub use bot::{BotChoice, BotTier, PickIndex, RandomPicker, select_move, select_move_with_tier};
pub use config::{GameConfig, MIN_SIZE};
pub use contracts::{
    CellIsEmpty, GameNotFinished, IndexInRange, LegalMove, PlayersTurn, Snapshot, next_move,
    validate,
};
pub use error::{ConfigError, InvalidMove, MoveError};
pub use invariants::{
    AlternatingTurns, ContiguousTurns, DistinctCells, HistoryInvariants, HistoryView, Invariant,
    InvariantSet, InvariantViolation, check_history,
};
pub use rules::win::{Line, lines, winning_line};
pub use rules::{check_winner, evaluate, is_full};
pub use types::{Cell, GameOutcome, GameResult, Player};
