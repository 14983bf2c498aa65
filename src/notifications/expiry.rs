// SPDX-License-Identifier: MPL-2.0
//! Per-entry expiry timers.
//!
//! Each timer is a tokio task that sleeps for the entry's duration and then
//! hands `(id, generation)` to a callback. The scheduler remembers the
//! generation of the one live timer per id; a callback whose generation is no
//! longer registered lost a race with `cancel` and must do nothing.

use super::notification::NotificationId;
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Token identifying one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

impl Generation {
    #[cfg(test)]
    pub(crate) fn stale() -> Self {
        Self(u64::MAX)
    }
}

#[derive(Debug)]
struct PendingExpiry {
    generation: Generation,
    task: JoinHandle<()>,
}

/// Tracks at most one live timer per notification id.
#[derive(Debug)]
pub struct ExpiryScheduler {
    runtime: Handle,
    pending: HashMap<NotificationId, PendingExpiry>,
    next_generation: u64,
}

impl ExpiryScheduler {
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Starts a timer for `id` that calls `on_fire` once `after` has elapsed.
    ///
    /// A timer already registered for `id` is cancelled first.
    pub fn schedule<F>(&mut self, id: NotificationId, after: Duration, on_fire: F) -> Generation
    where
        F: FnOnce(Generation) + Send + 'static,
    {
        self.cancel(id);

        let generation = Generation(self.next_generation);
        self.next_generation += 1;

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            on_fire(generation);
        });
        tracing::trace!(%id, ?after, ?generation, "expiry scheduled");
        self.pending.insert(id, PendingExpiry { generation, task });
        generation
    }

    /// Cancels the timer for `id`. Returns `false` if none was pending.
    pub fn cancel(&mut self, id: NotificationId) -> bool {
        match self.pending.remove(&id) {
            Some(pending) => {
                pending.task.abort();
                tracing::trace!(%id, generation = ?pending.generation, "expiry cancelled");
                true
            }
            None => false,
        }
    }

    /// Cancels every pending timer and returns how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.pending.len();
        for (_, pending) in self.pending.drain() {
            pending.task.abort();
        }
        count
    }

    /// Called from a fired timer. Returns `true` and forgets the timer if
    /// `generation` is still the live one for `id`.
    pub fn settle(&mut self, id: NotificationId, generation: Generation) -> bool {
        match self.pending.get(&id) {
            Some(pending) if pending.generation == generation => {
                self.pending.remove(&id);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self, id: NotificationId) -> bool {
        self.pending.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Drop for ExpiryScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
