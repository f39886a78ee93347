//! Room lifecycle management for maketen.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its roster,
//! board history, state machine, and timers. The actor's mailbox is the
//! per-room mutual-exclusion scope: every player action and every timer tick
//! for one room executes serialized on that task, while different rooms
//! never block each other.
//!
//! # Key types
//!
//! - [`RoomRegistry`] - creates/destroys rooms, hands out handles
//! - [`RoomHandle`] - send operations to a running room actor
//! - [`RoomState`] - lifecycle state machine
//! - [`RoomConfig`] - board size, timer durations, rng seeding
//! - [`NotificationSink`] - where semantic events are pushed after mutations

mod config;
mod error;
mod events;
mod player;
mod registry;
mod room;
mod state;

pub use config::RoomConfig;
pub use error::RoomError;
pub use events::{NotificationSink, RoomEvent};
pub use player::{Player, PlayerData};
pub use registry::RoomRegistry;
pub use room::{GameResult, MoveOutcome, RoomHandle, RoomSnapshot};
pub use state::RoomState;
