// SPDX-License-Identifier: MPL-2.0
//! Shared handle to the lifecycle event log.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::diagnostics::BufferCapacity;
use crate::notifications::Kind;

use super::{CircularBuffer, DiagnosticEvent, LifecycleEvent};

/// Handle for recording and reading lifecycle events.
///
/// This handle is cheap to clone and can be shared across threads. All
/// clones see the same bounded log.
#[derive(Clone, Debug)]
pub struct DiagnosticsHandle {
    log: Arc<Mutex<CircularBuffer<DiagnosticEvent>>>,
}

/// Number of warning and error notifications recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub warnings: usize,
    pub errors: usize,
}

impl DiagnosticsHandle {
    #[must_use]
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            log: Arc::new(Mutex::new(CircularBuffer::new(capacity))),
        }
    }

    /// Records an event, evicting the oldest one when the log is full.
    pub fn record(&self, event: LifecycleEvent) {
        self.lock().push(DiagnosticEvent::new(event));
    }

    /// Returns a snapshot of the log, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Counts enqueued warnings and errors still present in the log.
    #[must_use]
    pub fn severity_counts(&self) -> SeverityCounts {
        self.lock()
            .iter()
            .fold(SeverityCounts::default(), |mut counts, entry| {
                match entry.event {
                    LifecycleEvent::Enqueued {
                        kind: Kind::Warning,
                        ..
                    } => counts.warnings += 1,
                    LifecycleEvent::Enqueued {
                        kind: Kind::Error, ..
                    } => counts.errors += 1,
                    _ => {}
                }
                counts
            })
    }

    fn lock(&self) -> MutexGuard<'_, CircularBuffer<DiagnosticEvent>> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DiagnosticsHandle {
    fn default() -> Self {
        Self::new(BufferCapacity::default())
    }
}
