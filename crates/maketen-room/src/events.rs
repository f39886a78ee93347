//! Semantic notification payloads emitted by room actors.
//!
//! The core does not format or transport these - it hands them to an
//! injected [`NotificationSink`] and moves on. The production sink fans
//! them out over whatever transport the outer layer uses; tests plug in an
//! in-memory recorder.

use maketen_protocol::{BoardData, PlayerId, PlayerScore, RoomId};
use serde::{Deserialize, Serialize};

/// Receives fire-and-forget events from room actors.
///
/// Called from inside the room's serialized execution scope, so
/// implementations must not block: enqueue and return.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, room: RoomId, event: RoomEvent);
}

/// Everything a room broadcasts to its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RoomEvent {
    /// A player took a seat.
    PlayerJoined { player: PlayerId, name: String },
    /// A player gave up their seat (leave or expired grace period).
    PlayerLeft { player: PlayerId },
    /// A player toggled their ready flag.
    PlayerReady { player: PlayerId, ready: bool },
    /// Every present player is ready.
    AllReady,
    /// Start was issued; the pre-game countdown began.
    CountdownStarted { seconds: u32 },
    /// One second of pre-game countdown remains ticked off.
    CountdownTick { remaining: u32 },
    /// The countdown finished and a fresh board is live.
    GameStarted { board: BoardData },
    /// A successful move mutated the board.
    BoardUpdated {
        scorer: PlayerId,
        gain: u32,
        board: BoardData,
    },
    /// The game is about to end (per-second warning).
    GameEnding { remaining: u32 },
    /// The game timer expired; final scores attached.
    GameEnded { results: Vec<PlayerScore> },
    /// The room returned to WaitingForPlayers (results closed, abort, or
    /// zero occupancy).
    RoomReset,
    /// A player's connection dropped; their seat is held for the grace
    /// period.
    PlayerDisconnected { player: PlayerId },
    /// A player came back within the grace period.
    PlayerReconnected { player: PlayerId },
}
