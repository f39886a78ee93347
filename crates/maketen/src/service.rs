//! `GameService`: the core's complete external interface.
//!
//! The HTTP/WebSocket layer (out of scope here) holds one `GameService`
//! and translates requests into these calls. Each method resolves the room
//! handle under a short registry lock, then awaits the room actor outside
//! it - so slow rooms never serialize against each other or against room
//! creation.

use std::sync::Arc;

use maketen_protocol::{BoardData, PlayerId, RoomId};
use maketen_room::{
    GameResult, MoveOutcome, NotificationSink, RoomConfig, RoomError,
    RoomRegistry, RoomSnapshot,
};
use tokio::sync::Mutex;

/// The entry point for every operation the core supports.
pub struct GameService {
    registry: Mutex<RoomRegistry>,
}

impl GameService {
    /// Builds a service whose rooms share `config` and report events to
    /// `sink`.
    pub fn new(config: RoomConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            registry: Mutex::new(RoomRegistry::new(config, sink)),
        }
    }

    async fn handle(
        &self,
        room: RoomId,
    ) -> Result<maketen_room::RoomHandle, RoomError> {
        self.registry.lock().await.room(room)
    }

    /// Creates a room and returns its initial snapshot.
    pub async fn create_room(&self, name: &str) -> Result<RoomSnapshot, RoomError> {
        let handle = {
            let mut registry = self.registry.lock().await;
            let room_id = registry.create_room(name);
            registry.room(room_id)?
        };
        handle.snapshot().await
    }

    /// Adds a player to a room.
    pub async fn join_room(
        &self,
        room: RoomId,
        player: PlayerId,
        name: &str,
    ) -> Result<RoomSnapshot, RoomError> {
        self.handle(room).await?.join(player, name).await
    }

    /// Sets or clears a player's ready flag.
    pub async fn set_ready(
        &self,
        room: RoomId,
        player: PlayerId,
        ready: bool,
    ) -> Result<RoomSnapshot, RoomError> {
        self.handle(room).await?.set_ready(player, ready).await
    }

    /// Starts the game; only the first player may call this.
    pub async fn start_game(
        &self,
        room: RoomId,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.handle(room).await?.start(player).await
    }

    /// Submits a formula against the board version the player last saw.
    pub async fn submit_move(
        &self,
        room: RoomId,
        player: PlayerId,
        expression: &str,
        version: u64,
    ) -> Result<MoveOutcome, RoomError> {
        self.handle(room)
            .await?
            .submit_move(player, expression, version)
            .await
    }

    /// Closes a player's result screen; the last close resets the room.
    pub async fn close_result(
        &self,
        room: RoomId,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.handle(room).await?.close_result(player).await
    }

    /// Removes a player; idempotent. Zero occupancy hard-resets the room.
    pub async fn leave_player(
        &self,
        room: RoomId,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.handle(room).await?.leave(player).await
    }

    /// Current snapshot of one room.
    pub async fn room(&self, room: RoomId) -> Result<RoomSnapshot, RoomError> {
        self.handle(room).await?.snapshot().await
    }

    /// Snapshots of every live room.
    pub async fn list_rooms(&self) -> Vec<RoomSnapshot> {
        let registry = self.registry.lock().await;
        registry.list_rooms().await
    }

    /// Point-in-time copy of a room's current board.
    pub async fn board(&self, room: RoomId) -> Result<BoardData, RoomError> {
        self.handle(room).await?.board().await
    }

    /// Results of games finished since the room's last hard reset.
    pub async fn room_results(
        &self,
        room: RoomId,
    ) -> Result<Vec<GameResult>, RoomError> {
        self.handle(room).await?.results().await
    }

    /// Connection-manager callback: a player's socket dropped.
    pub async fn player_disconnected(
        &self,
        room: RoomId,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.handle(room).await?.player_disconnected(player).await
    }

    /// Connection-manager callback: a player's socket came back.
    pub async fn player_reconnected(
        &self,
        room: RoomId,
        player: PlayerId,
    ) -> Result<RoomSnapshot, RoomError> {
        self.handle(room).await?.player_reconnected(player).await
    }

    /// Shuts a room down and forgets it.
    pub async fn destroy_room(&self, room: RoomId) -> Result<(), RoomError> {
        self.registry.lock().await.destroy_room(room).await
    }
}
