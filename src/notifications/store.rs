// SPDX-License-Identifier: MPL-2.0
//! Ordered storage of active notifications.
//!
//! The `Store` owns the only copy of the active entries and applies the three
//! state transitions (add, remove by id, clear). Each transition that changed
//! something bumps the revision. Listeners are not called from inside the
//! store: the owner takes a [`Publication`] and delivers it once it has
//! released whatever lock guards the store.

use super::notification::{Notification, NotificationId};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with the active entries, oldest first.
pub type Listener = Arc<dyn Fn(&[Notification]) + Send + Sync>;

/// Identifies a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct Store {
    /// Active entries in insertion order.
    entries: Vec<Notification>,
    listeners: BTreeMap<ListenerId, Listener>,
    next_listener: u64,
    revision: u64,
}

/// Snapshot of the queue plus the listeners to hand it to.
pub struct Publication {
    revision: u64,
    entries: Vec<Notification>,
    listeners: Vec<Listener>,
}

impl Publication {
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Calls every listener in subscription order. `keep_going` is checked
    /// before each call; delivery stops once it returns `false`.
    pub fn deliver_while(&self, mut keep_going: impl FnMut() -> bool) {
        for listener in &self.listeners {
            if !keep_going() {
                break;
            }
            listener(&self.entries);
        }
    }

    pub fn deliver(&self) {
        self.deliver_while(|| true);
    }
}

impl fmt::Debug for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publication")
            .field("revision", &self.revision)
            .field("entries", &self.entries.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] if an entry with the same id is active.
    /// The store is left untouched in that case.
    pub fn add(&mut self, entry: Notification) -> Result<()> {
        if self.contains(entry.id()) {
            return Err(Error::DuplicateId(entry.id()));
        }
        self.entries.push(entry);
        self.revision += 1;
        Ok(())
    }

    /// Removes the entry with `id`, returning it. Unknown ids are a no-op.
    pub fn remove_by_id(&mut self, id: NotificationId) -> Option<Notification> {
        let pos = self.entries.iter().position(|n| n.id() == id)?;
        let removed = self.entries.remove(pos);
        self.revision += 1;
        Some(removed)
    }

    /// Removes every entry and returns how many there were.
    pub fn clear_all(&mut self) -> usize {
        let count = self.entries.len();
        if count > 0 {
            self.entries.clear();
            self.revision += 1;
        }
        count
    }

    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.entries.iter().any(|n| n.id() == id)
    }

    #[must_use]
    pub fn get(&self, id: NotificationId) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id() == id)
    }

    /// Active entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers a listener. It is not called until the next mutation.
    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, listener);
        id
    }

    /// Returns `false` if the listener was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of transitions that changed the entries so far.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Captures the current entries and listeners for delivery outside the store.
    #[must_use]
    pub fn publication(&self) -> Publication {
        Publication {
            revision: self.revision,
            entries: self.entries.clone(),
            listeners: self.listeners.values().cloned().collect(),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("entries", &self.entries)
            .field("listeners", &self.listeners.len())
            .field("revision", &self.revision)
            .finish()
    }
}
