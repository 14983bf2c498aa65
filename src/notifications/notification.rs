// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the immutable `Notification` entry, its `Kind`, and
//! the `NotifyOptions` callers pass to the dispatcher.

use crate::config::PERSISTENT_DURATION_MS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Unique identifier for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates a new unique notification ID.
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw id. Only useful for tests and for replaying ids
    /// received from a render surface.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What the notification is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Operation completed successfully.
    #[default]
    Success,
    /// Operation failed.
    Error,
    /// Something needs attention but nothing failed.
    Warning,
    /// Neutral information.
    Info,
}

impl Kind {
    /// Returns the lowercase label used in logs and by render surfaces.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Kind::Success => "success",
            Kind::Error => "error",
            Kind::Warning => "warning",
            Kind::Info => "info",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolved auto-dismiss behavior of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Stays until dismissed or cleared.
    Never,
    /// Removed once this much time has passed since creation.
    After(Duration),
}

impl Expiry {
    /// Resolves a caller-supplied duration against the dispatcher default.
    ///
    /// `None` takes the default, `Some(0)` disables expiry.
    #[must_use]
    pub fn resolve(duration_ms: Option<u64>, default: Duration) -> Self {
        match duration_ms {
            None => Expiry::After(default),
            Some(PERSISTENT_DURATION_MS) => Expiry::Never,
            Some(ms) => Expiry::After(Duration::from_millis(ms)),
        }
    }

    #[must_use]
    pub fn duration(self) -> Option<Duration> {
        match self {
            Expiry::Never => None,
            Expiry::After(duration) => Some(duration),
        }
    }
}

/// A button offered alongside the message, e.g. "Retry" or "Undo".
#[derive(Clone)]
pub struct Action {
    label: String,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl Action {
    pub fn new(label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            callback: Arc::new(callback),
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs the callback. Does not dismiss the notification.
    pub fn invoke(&self) {
        (self.callback)();
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Optional settings for a single `notify` call.
#[derive(Debug, Clone, Default)]
pub struct NotifyOptions {
    pub title: Option<String>,
    /// `None` uses the dispatcher default, `Some(0)` never expires.
    pub duration_ms: Option<u64>,
    pub action: Option<Action>,
}

impl NotifyOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Keeps the notification until it is dismissed.
    #[must_use]
    pub fn persistent(self) -> Self {
        self.with_duration_ms(PERSISTENT_DURATION_MS)
    }

    #[must_use]
    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// A notification held by the queue. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    kind: Kind,
    message: String,
    title: Option<String>,
    expiry: Expiry,
    action: Option<Action>,
    created_at: Instant,
}

impl Notification {
    /// Builds an entry with a freshly generated id.
    pub fn new(
        kind: Kind,
        message: impl Into<String>,
        options: NotifyOptions,
        default: Duration,
    ) -> Self {
        Self::with_id(NotificationId::next(), kind, message, options, default)
    }

    pub(crate) fn with_id(
        id: NotificationId,
        kind: Kind,
        message: impl Into<String>,
        options: NotifyOptions,
        default: Duration,
    ) -> Self {
        Self {
            id,
            kind,
            message: message.into(),
            title: options.title,
            expiry: Expiry::resolve(options.duration_ms, default),
            action: options.action,
            created_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn expiry(&self) -> Expiry {
        self.expiry
    }

    #[must_use]
    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    #[must_use]
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
