//! Strictly N-toe sessions - the caller side of the rules
//!
//! Holds game records in memory and drives `strictly_ntoe` the way a
//! persistence-backed server would: create a game, submit moves through the
//! validator, append them with a conditional update, record results, let a
//! bot take its turn, list recent games and scrub through replays.
//!
//! # Example
//!
//! ```
//! use strictly_ntoe::{MoveRequest, Player};
//! use strictly_ntoe_session::GameRegistry;
//!
//! # fn example() -> Result<(), strictly_ntoe_session::SessionError> {
//! let registry = GameRegistry::default();
//! let id = registry.create_game(Some(3), Some(Player::X))?;
//! registry.submit_move(id, MoveRequest::new(Player::X, 4))?;
//! let reply = registry.play_bot_turn(id, Player::O, &mut |len: usize| len / 2)?;
//! assert_ne!(reply.mv().board_index(), 4);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod record;
mod registry;

pub use config::{RegistryConfig, RegistryConfigError};
pub use error::SessionError;
pub use record::{GameId, GameRecord, GameSummary, RecordedMove, ReplayFrame};
pub use registry::GameRegistry;
