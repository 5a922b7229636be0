//! Game rules for N×N tic-tac-toe.
//!
//! Pure functions over a projected [`Board`](super::Board). Rules are kept
//! apart from board storage so callers can evaluate any board, including
//! simulated ones.

pub mod draw;
pub mod outcome;
pub mod win;

pub use draw::is_full;
pub use outcome::evaluate;
pub use win::check_winner;
