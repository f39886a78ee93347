//! Room configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for a room instance.
///
/// The defaults match the reference game: a 4x4 board, a 3-second start
/// countdown, a 120-second game with a 10-second ending warning, and a
/// 30-second grace period before a disconnected player is dropped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Board edge length. Must be even (blocks are quadrants).
    pub board_size: usize,

    /// Maximum players allowed in the room.
    pub max_players: usize,

    /// Countdown between "start" and the first board appearing.
    pub countdown: Duration,

    /// Total play time per game.
    pub game_duration: Duration,

    /// Length of the per-second "game ending" countdown at the end of
    /// `game_duration`.
    pub ending_warning: Duration,

    /// How long a disconnected player keeps their seat and score before
    /// being removed.
    pub reconnect_grace: Duration,

    /// Seed for the room's random number generator. `None` draws from OS
    /// entropy; tests pin this for reproducible boards.
    pub rng_seed: Option<u64>,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            board_size: 4,
            max_players: 8,
            countdown: Duration::from_secs(3),
            game_duration: Duration::from_secs(120),
            ending_warning: Duration::from_secs(10),
            reconnect_grace: Duration::from_secs(30),
            rng_seed: None,
        }
    }
}

impl RoomConfig {
    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically when a room is spawned. Rules:
    /// - `board_size` must be even and at least 2; invalid values fall back
    ///   to 4.
    /// - `max_players` must be at least 1.
    /// - `ending_warning` is capped at `game_duration`.
    pub fn validated(mut self) -> Self {
        if self.board_size < 2 || self.board_size % 2 != 0 {
            warn!(
                size = self.board_size,
                "board_size must be even and >= 2 - falling back to 4"
            );
            self.board_size = 4;
        }
        if self.max_players == 0 {
            warn!("max_players must be >= 1 - falling back to 1");
            self.max_players = 1;
        }
        if self.ending_warning > self.game_duration {
            self.ending_warning = self.game_duration;
        }
        self
    }
}
