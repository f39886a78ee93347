//! Roster entries for players in a room.

use maketen_protocol::PlayerId;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// A player's seat in a room.
///
/// Created on join, mutated by ready/cancel, score increments,
/// disconnect/reconnect notifications; removed on leave or when the
/// disconnect grace period expires.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_ready: bool,
    pub has_closed_result: bool,
    pub score: u32,
    pub is_connected: bool,
    /// Set when the connection drops, cleared on reconnect.
    pub last_seen_at: Option<Instant>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_ready: false,
            has_closed_result: false,
            score: 0,
            is_connected: true,
            last_seen_at: None,
        }
    }

    /// Serializable copy for snapshots and events.
    pub fn data(&self) -> PlayerData {
        PlayerData {
            id: self.id,
            name: self.name.clone(),
            is_ready: self.is_ready,
            has_closed_result: self.has_closed_result,
            score: self.score,
            is_connected: self.is_connected,
        }
    }
}

/// The wire-facing view of a [`Player`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerData {
    pub id: PlayerId,
    pub name: String,
    pub is_ready: bool,
    pub has_closed_result: bool,
    pub score: u32,
    pub is_connected: bool,
}
