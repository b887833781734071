//! Game configuration accepted by [`World::with_config`](crate::World::with_config).

use diplomacy_core::{DEFAULT_BOARD_SIZE, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunable parameters for a new game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Number of rows and columns on the square board.
    pub board_size: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
        }
    }
}

impl GameConfig {
    /// Checks that the configuration can host the starting layout and fits
    /// within [`MAX_BOARD_SIZE`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.board_size < MIN_BOARD_SIZE {
            return Err(ConfigError::BoardTooSmall {
                size: self.board_size,
                minimum: MIN_BOARD_SIZE,
            });
        }
        if self.board_size > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge {
                size: self.board_size,
                maximum: MAX_BOARD_SIZE,
            });
        }
        Ok(())
    }
}

/// Reasons a configuration is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The starting corners would overlap on a board this small.
    #[error("board size {size} is below the minimum of {minimum}")]
    BoardTooSmall {
        /// Requested board size.
        size: u32,
        /// Smallest supported board size.
        minimum: u32,
    },
    /// The board would not fit the supported storage.
    #[error("board size {size} exceeds the maximum of {maximum}")]
    BoardTooLarge {
        /// Requested board size.
        size: u32,
        /// Largest supported board size.
        maximum: u32,
    },
}
