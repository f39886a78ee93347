//! Room registry: creates, tracks, and destroys rooms.
//!
//! An explicit object constructed once at startup and passed by reference
//! to whoever needs it - no process-wide globals, so tests build isolated
//! registries freely.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use maketen_protocol::RoomId;

use crate::room::{RoomHandle, RoomSnapshot, spawn_room};
use crate::{NotificationSink, RoomConfig, RoomError};

/// Counter for generating unique room IDs.
static NEXT_ROOM_ID: AtomicU64 = AtomicU64::new(1);

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Owns the set of live rooms.
///
/// Cheap handle clones go out to callers; the registry itself is the only
/// place rooms are created or torn down.
pub struct RoomRegistry {
    config: RoomConfig,
    sink: Arc<dyn NotificationSink>,
    rooms: HashMap<RoomId, RoomHandle>,
}

impl RoomRegistry {
    /// Creates an empty registry. Every room it spawns shares `config` and
    /// reports events to `sink`.
    pub fn new(config: RoomConfig, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            config,
            sink,
            rooms: HashMap::new(),
        }
    }

    /// Spawns a new room actor and returns its ID.
    pub fn create_room(&mut self, name: &str) -> RoomId {
        let room_id = RoomId(NEXT_ROOM_ID.fetch_add(1, Ordering::Relaxed));
        let handle = spawn_room(
            room_id,
            name.to_string(),
            self.config.clone(),
            Arc::clone(&self.sink),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, name, "room created");
        room_id
    }

    /// A clonable handle to a room.
    pub fn room(&self, room_id: RoomId) -> Result<RoomHandle, RoomError> {
        self.rooms
            .get(&room_id)
            .cloned()
            .ok_or(RoomError::NotFound(room_id))
    }

    /// Shuts a room down and forgets it.
    pub async fn destroy_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        let _ = handle.shutdown().await;
        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Snapshots of every live room. Rooms that fail to respond (shutting
    /// down) are skipped.
    pub async fn list_rooms(&self) -> Vec<RoomSnapshot> {
        let mut snapshots = Vec::with_capacity(self.rooms.len());
        for handle in self.rooms.values() {
            if let Ok(snapshot) = handle.snapshot().await {
                snapshots.push(snapshot);
            }
        }
        snapshots
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// IDs of every live room.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().copied().collect()
    }
}
