//! Per-game configuration.

use super::error::ConfigError;
use super::types::Player;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Smallest board the rules accept.
pub const MIN_SIZE: usize = 3;

/// Board size and opening player, fixed for the life of a game.
///
/// Deserialization goes through [`GameConfig::new`], so stored configs obey
/// the same bounds as fresh ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredConfig")]
pub struct GameConfig {
    /// Side length of the board.
    size: usize,
    /// Player who makes the first move.
    first_player: Player,
}

impl GameConfig {
    /// Creates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `size` is below [`MIN_SIZE`] or the cell
    /// count does not fit in a `usize`.
    #[instrument]
    pub fn new(size: usize, first_player: Player) -> Result<Self, ConfigError> {
        if size < MIN_SIZE {
            return Err(ConfigError::new(format!(
                "Board size {} is below the minimum of {}",
                size, MIN_SIZE
            )));
        }
        if size.checked_mul(size).is_none() {
            return Err(ConfigError::new(format!(
                "Board size {} has too many cells",
                size
            )));
        }
        debug!(size, ?first_player, "Game config created");
        Ok(Self { size, first_player })
    }

    /// Side length of the board.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Player who moves first.
    pub fn first_player(&self) -> Player {
        self.first_player
    }

    /// Number of cells on the board.
    pub fn cell_count(&self) -> usize {
        self.size * self.size
    }

    /// Player expected to move after `moves_played` moves.
    pub fn expected_player(&self, moves_played: usize) -> Player {
        if moves_played % 2 == 0 {
            self.first_player
        } else {
            self.first_player.opponent()
        }
    }
}

/// Wire shape of [`GameConfig`] before validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredConfig {
    size: usize,
    first_player: Player,
}

impl TryFrom<StoredConfig> for GameConfig {
    type Error = ConfigError;

    fn try_from(stored: StoredConfig) -> Result<Self, Self::Error> {
        GameConfig::new(stored.size, stored.first_player)
    }
}
