//! Identity newtypes and the payload structs pushed to clients.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over `u64` so a `PlayerId` can never be confused with a
/// `RoomId` even though both are plain integers underneath.
/// `#[serde(transparent)]` keeps the JSON representation a bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Board snapshot
// ---------------------------------------------------------------------------

/// A point-in-time copy of a game board, safe to hand across task
/// boundaries and serialize to clients.
///
/// `content` is row-major: cell (r, c) of an NxN board lives at index
/// `r * size + c`. `version` is the optimistic-concurrency counter a
/// client must echo back when submitting a move against this snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardData {
    pub content: Vec<u8>,
    pub version: u64,
    pub size: usize,
}

impl BoardData {
    /// Value of cell (row, col), or `None` if out of range.
    pub fn cell(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.content.get(row * self.size + col).copied()
    }
}

// ---------------------------------------------------------------------------
// Score entries
// ---------------------------------------------------------------------------

/// One player's score line in a result listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerScore {
    pub player: PlayerId,
    pub name: String,
    pub score: u32,
}

// =========================================================================
// Tests
// =========================================================================
