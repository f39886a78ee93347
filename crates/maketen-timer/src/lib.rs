//! Cancellable delayed-task queue for room timers.
//!
//! Rooms need a handful of one-shot deadlines - countdown ticks, the game
//! timer, disconnect grace periods - that must be cancellable when the room
//! changes state underneath them. Instead of spawning detached sleep tasks,
//! each room owns a [`TimerQueue`] and polls it from its actor loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         event = timers.next() => { /* handle the due timer */ }
//!     }
//! }
//! ```
//!
//! When the queue is empty, [`TimerQueue::next`] pends forever, so the
//! `select!` simply processes other branches - the same idle behavior as an
//! event-driven tick scheduler. Everything runs on the Tokio clock, so tests
//! drive it deterministically with `start_paused` and `time::advance`.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::trace;

/// Opaque handle to a scheduled entry, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerKey(u64);

struct Entry<T> {
    key: u64,
    deadline: Instant,
    event: T,
}

/// A set of pending one-shot deadlines, each carrying an event value.
///
/// Not a fixed-rate ticker: every entry fires once and is removed. Entries
/// with equal deadlines fire in scheduling order.
pub struct TimerQueue<T> {
    entries: Vec<Entry<T>>,
    next_key: u64,
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_key: 1,
        }
    }

    /// Schedules `event` to fire after `delay`. Returns a key that can be
    /// passed to [`cancel`](Self::cancel).
    pub fn schedule(&mut self, delay: Duration, event: T) -> TimerKey {
        let key = self.next_key;
        self.next_key += 1;
        self.entries.push(Entry {
            key,
            deadline: Instant::now() + delay,
            event,
        });
        trace!(key, delay_ms = delay.as_millis() as u64, "timer scheduled");
        TimerKey(key)
    }

    /// Cancels a pending entry. Returns `false` if it already fired or was
    /// cancelled before.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key != key.0);
        let removed = self.entries.len() != before;
        if removed {
            trace!(key = key.0, "timer cancelled");
        }
        removed
    }

    /// Drops every pending entry.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            trace!(count = self.entries.len(), "timer queue cleared");
            self.entries.clear();
        }
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Waits for the earliest entry to come due and returns its event.
    ///
    /// Pends forever while the queue is empty. Cancel-safe: dropping this
    /// future mid-wait (as `tokio::select!` does) leaves every entry in
    /// place, and the next call re-reads the queue - so entries scheduled
    /// or cancelled between polls are picked up correctly.
    pub async fn next(&mut self) -> T {
        loop {
            let Some(deadline) = self.entries.iter().map(|e| e.deadline).min() else {
                // Nothing scheduled: never resolve, let select! run other
                // branches.
                std::future::pending::<()>().await;
                unreachable!()
            };

            time::sleep_until(deadline).await;

            let now = Instant::now();
            let due = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.deadline <= now)
                .min_by_key(|(_, e)| (e.deadline, e.key))
                .map(|(i, _)| i);
            if let Some(index) = due {
                let entry = self.entries.remove(index);
                trace!(key = entry.key, "timer fired");
                return entry.event;
            }
        }
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
