// SPDX-License-Identifier: MPL-2.0
//! Lifecycle events recorded for each notification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notifications::{Kind, NotificationId};

/// A state transition observed by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// A notification entered the queue.
    Enqueued {
        id: NotificationId,
        kind: Kind,
        /// `None` for persistent entries.
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    /// Removed by an explicit dismiss call.
    Dismissed { id: NotificationId },
    /// Removed by its expiry timer.
    Expired { id: NotificationId },
    /// Bulk removal through `clear_all` or `shutdown`.
    Cleared { count: usize },
    /// The store refused an entry whose id was already active.
    DuplicateRejected { id: NotificationId },
}

impl LifecycleEvent {
    /// Returns the id this event concerns, if it concerns a single entry.
    #[must_use]
    pub fn id(&self) -> Option<NotificationId> {
        match self {
            LifecycleEvent::Enqueued { id, .. }
            | LifecycleEvent::Dismissed { id }
            | LifecycleEvent::Expired { id }
            | LifecycleEvent::DuplicateRejected { id } => Some(*id),
            LifecycleEvent::Cleared { .. } => None,
        }
    }
}

/// A timestamped lifecycle event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEvent {
    pub at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: LifecycleEvent,
}

impl DiagnosticEvent {
    /// Creates a new diagnostic event with the current timestamp.
    #[must_use]
    pub fn new(event: LifecycleEvent) -> Self {
        Self {
            at: Utc::now(),
            event,
        }
    }
}
