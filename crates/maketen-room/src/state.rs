//! The room lifecycle state machine.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a room.
///
/// The normal cycle is:
///
/// ```text
/// WaitingForPlayers → AllReady → Countdown → GameInProgress → GameEnded
///         ↑                                                      │
///         └──────────────────────────────────────────────────────┘
/// ```
///
/// `WaitingForPlayers` is additionally reachable from **every** state - the
/// abort/zero-occupancy path - and from itself (a hard reset while already
/// waiting). Every other edge is illegal and rejected with an explicit
/// error, never silently clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomState {
    /// Room exists, accepting joins; not everyone is ready.
    WaitingForPlayers,
    /// Every present player is ready; the first player may start.
    AllReady,
    /// Start was issued; a short countdown runs before play begins.
    Countdown,
    /// The game timer is running and moves are accepted.
    GameInProgress,
    /// The timer expired; players are looking at the results screen.
    GameEnded,
}

impl RoomState {
    /// Returns `true` if the room accepts new players in this state.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForPlayers | Self::AllReady)
    }

    /// Returns `true` if a game is being set up or played.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Countdown | Self::GameInProgress)
    }

    /// Returns `true` if transitioning to `target` is a legal edge.
    pub fn can_transition_to(self, target: Self) -> bool {
        use RoomState::*;
        match (self, target) {
            // Abort/reset path: WaitingForPlayers is reachable from
            // everywhere, including itself.
            (_, WaitingForPlayers) => true,
            (WaitingForPlayers, AllReady) => true,
            (AllReady, Countdown) => true,
            (Countdown, GameInProgress) => true,
            (GameInProgress, GameEnded) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForPlayers => write!(f, "WaitingForPlayers"),
            Self::AllReady => write!(f, "AllReady"),
            Self::Countdown => write!(f, "Countdown"),
            Self::GameInProgress => write!(f, "GameInProgress"),
            Self::GameEnded => write!(f, "GameEnded"),
        }
    }
}
