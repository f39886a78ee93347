//! # maketen
//!
//! Room server core for a real-time multiplayer arithmetic puzzle: players
//! join a room, a shared 4x4 digit board is generated, and everyone races
//! to submit postfix expressions that consume rows, columns, diagonals, or
//! blocks summing to 10.
//!
//! The crate exposes [`GameService`] - the complete external interface of
//! the core. Transport, authentication, and connection bookkeeping live
//! outside; they call these methods and forward the [`RoomEvent`]s the
//! injected [`NotificationSink`] receives.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use maketen::prelude::*;
//!
//! struct LogSink;
//! impl NotificationSink for LogSink {
//!     fn notify(&self, room: RoomId, event: RoomEvent) {
//!         tracing::info!(%room, ?event, "room event");
//!     }
//! }
//!
//! # async fn run() -> Result<(), RoomError> {
//! let service = GameService::new(RoomConfig::default(), Arc::new(LogSink));
//! let room = service.create_room("lobby 1").await?;
//! service.join_room(room.room_id, PlayerId(1), "alice").await?;
//! # Ok(())
//! # }
//! ```

mod service;

pub use service::GameService;

pub use maketen_room::{
    GameResult, MoveOutcome, NotificationSink, Player, PlayerData, RoomConfig,
    RoomError, RoomEvent, RoomRegistry, RoomSnapshot, RoomState,
};

/// Installs a `tracing` subscriber reading `RUST_LOG`. Safe to call more
/// than once; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

/// The common imports for building on the core.
pub mod prelude {
    pub use crate::service::GameService;
    pub use crate::init_tracing;
    pub use maketen_game::expr;
    pub use maketen_game::{Board, BoardError, ConflictError, ExprError, LineRef};
    pub use maketen_protocol::{BoardData, PlayerId, PlayerScore, RoomId};
    pub use maketen_room::{
        GameResult, MoveOutcome, NotificationSink, PlayerData, RoomConfig,
        RoomError, RoomEvent, RoomSnapshot, RoomState,
    };
}
