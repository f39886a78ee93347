//! Shared identity and payload types for the maketen core.
//!
//! Everything in this crate crosses the boundary between the core and its
//! callers (the HTTP/WebSocket layer, clients): identifiers, board
//! snapshots, score entries. These are the structures that get serialized
//! and pushed to room members, so their JSON shape is part of the contract.

mod types;

pub use types::{BoardData, PlayerId, PlayerScore, RoomId};
