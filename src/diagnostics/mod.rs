// SPDX-License-Identifier: MPL-2.0
//! Diagnostics module for inspecting the notification lifecycle.
//!
//! The dispatcher records every state transition it performs (enqueue,
//! dismiss, expiry, clear) into a memory-bounded circular buffer. Hosts can
//! attach a [`DiagnosticsHandle`] to a dispatcher and read the log back,
//! for example to answer "why did that toast disappear?".
//!
//! # Architecture
//!
//! - [`CircularBuffer`]: Generic ring buffer with configurable capacity
//! - [`LifecycleEvent`]: One state transition of one notification
//! - [`DiagnosticsHandle`]: Shared, thread-safe access to the log

mod buffer;
mod collector;
mod events;

pub use buffer::CircularBuffer;
pub use collector::{DiagnosticsHandle, SeverityCounts};
pub use events::{DiagnosticEvent, LifecycleEvent};
